use crate::pose::BodyPart;

/// 骨格の接続定義 (開始キーポイント, 終了キーポイント)
/// オーバーレイ描画側はこの順に線を引く
pub const SKELETON_EDGES: [(BodyPart, BodyPart); 16] = [
    // 顔
    (BodyPart::LeftEar, BodyPart::LeftEye),
    (BodyPart::LeftEye, BodyPart::Nose),
    (BodyPart::Nose, BodyPart::RightEye),
    (BodyPart::RightEye, BodyPart::RightEar),
    // 上半身
    (BodyPart::LeftShoulder, BodyPart::RightShoulder),
    (BodyPart::LeftShoulder, BodyPart::LeftElbow),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::RightShoulder, BodyPart::RightElbow),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    // 胴体
    (BodyPart::LeftShoulder, BodyPart::LeftHip),
    (BodyPart::RightShoulder, BodyPart::RightHip),
    (BodyPart::LeftHip, BodyPart::RightHip),
    // 下半身
    (BodyPart::LeftHip, BodyPart::LeftKnee),
    (BodyPart::LeftKnee, BodyPart::LeftAnkle),
    (BodyPart::RightHip, BodyPart::RightKnee),
    (BodyPart::RightKnee, BodyPart::RightAnkle),
];

/// 腕のエッジか（オーバーレイ側で色分けに使う）
pub fn is_arm_edge(start: BodyPart, end: BodyPart) -> bool {
    matches!(
        (start, end),
        (BodyPart::LeftShoulder, BodyPart::LeftElbow)
            | (BodyPart::LeftElbow, BodyPart::LeftWrist)
            | (BodyPart::RightShoulder, BodyPart::RightElbow)
            | (BodyPart::RightElbow, BodyPart::RightWrist)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_count() {
        assert_eq!(SKELETON_EDGES.len(), 16);
    }

    #[test]
    fn test_arm_edges() {
        let arm_edges = SKELETON_EDGES
            .iter()
            .filter(|(s, e)| is_arm_edge(*s, *e))
            .count();
        assert_eq!(arm_edges, 4);
    }

    #[test]
    fn test_torso_edge_is_not_arm() {
        assert!(!is_arm_edge(BodyPart::LeftHip, BodyPart::RightHip));
    }
}
