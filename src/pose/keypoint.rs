/// MoveNet 系モデルの 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 単一キーポイント（画像ピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// X座標 (px)
    pub x: f32,
    /// Y座標 (px, 下向きが正)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            confidence: 0.0,
        }
    }
}

/// 17キーポイントからなる1人・1フレーム分の姿勢
///
/// 上流の姿勢推定エンジンが1ティックごとに生成する。生成後は不変。
#[derive(Debug, Clone)]
pub struct Pose {
    pub keypoints: [Keypoint; BodyPart::COUNT],
    /// フレーム全体の信頼度
    pub score: f32,
}

impl Pose {
    pub fn new(keypoints: [Keypoint; BodyPart::COUNT], score: f32) -> Self {
        Self { keypoints, score }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, part: BodyPart) -> &Keypoint {
        &self.keypoints[part as usize]
    }

    /// 全キーポイントの平均信頼度
    pub fn average_confidence(&self) -> f32 {
        let sum: f32 = self.keypoints.iter().map(|k| k.confidence).sum();
        sum / BodyPart::COUNT as f32
    }

    /// 信頼度が閾値を超えるキーポイント数
    pub fn valid_count(&self, threshold: f32) -> usize {
        self.keypoints
            .iter()
            .filter(|k| k.confidence > threshold)
            .count()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::default(); BodyPart::COUNT],
            score: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_part_count() {
        assert_eq!(BodyPart::COUNT, 17);
    }

    #[test]
    fn test_body_part_from_index() {
        assert_eq!(BodyPart::from_index(0), Some(BodyPart::Nose));
        assert_eq!(BodyPart::from_index(16), Some(BodyPart::RightAnkle));
        assert_eq!(BodyPart::from_index(17), None);
    }

    #[test]
    fn test_keypoint_is_valid() {
        let kp = Keypoint::new(120.0, 240.0, 0.7);
        assert!(kp.is_valid(0.5));
        assert!(!kp.is_valid(0.8));
    }

    #[test]
    fn test_pose_get() {
        let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
        keypoints[BodyPart::Nose as usize] = Keypoint::new(320.0, 90.0, 0.9);

        let pose = Pose::new(keypoints, 0.9);
        let nose = pose.get(BodyPart::Nose);
        assert_eq!(nose.x, 320.0);
        assert_eq!(nose.y, 90.0);
        assert_eq!(nose.confidence, 0.9);
    }

    #[test]
    fn test_pose_average_confidence() {
        let keypoints = [Keypoint::new(0.0, 0.0, 0.5); BodyPart::COUNT];
        let pose = Pose::new(keypoints, 0.5);
        assert!((pose.average_confidence() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_pose_valid_count() {
        let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
        for kp in keypoints.iter_mut().take(12) {
            kp.confidence = 0.8;
        }
        let pose = Pose::new(keypoints, 0.8);
        assert_eq!(pose.valid_count(0.3), 12);
        assert_eq!(pose.valid_count(0.9), 0);
    }
}
