use crate::pose::{angle_degrees, BodyPart, Pose};

/// 個人の立位基準値（画像ピクセル単位）
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub shoulder_width: f32,
    pub height: f32,
}

/// 分類閾値に使う解決済みの基準スケール
///
/// 基準が確立していれば Baseline、なければ現フレームの生値
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    pub shoulder_width: f32,
    pub height: f32,
}

/// EMAの旧値保持率
const EMA_RETAIN: f32 = 0.7;
/// 膝角度がこれを超えると「脚が伸びている」(度)
const STANDING_KNEE_ANGLE: f32 = 165.0;
/// 手首が肩からこれ以上縦に離れていれば「腕を下ろしている」(px)
const ARMS_DOWN_MARGIN: f32 = 40.0;

/// 立位基準キャリブレータ（トラックスロットごとに1つ）
///
/// 確信度の高いリラックス立位フレームだけを基準値のEMAに取り込み、
/// 被写体の体格やカメラ距離に分類閾値を適応させる。
/// トラックが破棄されるまでリセットされない
pub struct BaselineCalibrator {
    baseline: Option<Baseline>,
}

impl BaselineCalibrator {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    /// 立位らしいフレームなら基準値を更新する
    ///
    /// 初回は観測値をそのまま採用、以降は EMA (0.7 / 0.3)
    pub fn observe(&mut self, pose: &Pose) {
        if !likely_standing(pose) {
            return;
        }

        let shoulder = shoulder_width(pose);
        let height = total_height(pose);

        self.baseline = Some(match self.baseline {
            None => Baseline {
                shoulder_width: shoulder,
                height,
            },
            Some(b) => Baseline {
                shoulder_width: b.shoulder_width * EMA_RETAIN + shoulder * (1.0 - EMA_RETAIN),
                height: b.height * EMA_RETAIN + height * (1.0 - EMA_RETAIN),
            },
        });
    }

    /// 分類に使う基準スケールを解決する
    ///
    /// 基準未確立の間は現フレームの生値（ゼロ除算防止で最低1.0）
    pub fn reference(&self, pose: &Pose) -> Reference {
        let (baseline_shoulder, baseline_height) = match self.baseline {
            Some(b) => (b.shoulder_width, b.height),
            None => (0.0, 0.0),
        };
        Reference {
            shoulder_width: if baseline_shoulder > 0.0 {
                baseline_shoulder
            } else {
                shoulder_width(pose).max(1.0)
            },
            height: if baseline_height > 0.0 {
                baseline_height
            } else {
                total_height(pose).max(1.0)
            },
        }
    }
}

impl Default for BaselineCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

/// 肩幅（px）
pub fn shoulder_width(pose: &Pose) -> f32 {
    (pose.get(BodyPart::RightShoulder).x - pose.get(BodyPart::LeftShoulder).x).abs()
}

/// 全身の縦スパン（px）
/// 鼻・両肩のうち最も高い点から、鼻・両足首のうち最も低い点まで
pub fn total_height(pose: &Pose) -> f32 {
    let nose_y = pose.get(BodyPart::Nose).y;
    let lowest = nose_y
        .max(pose.get(BodyPart::LeftAnkle).y)
        .max(pose.get(BodyPart::RightAnkle).y);
    let highest = nose_y
        .min(pose.get(BodyPart::LeftShoulder).y)
        .min(pose.get(BodyPart::RightShoulder).y);
    lowest - highest
}

/// リラックス立位ゲート
/// 両膝が伸びていて、両手首が肩の高さ付近にない（腕を下ろしている）こと
fn likely_standing(pose: &Pose) -> bool {
    let left_knee_angle = angle_degrees(
        pose.get(BodyPart::LeftHip),
        pose.get(BodyPart::LeftKnee),
        pose.get(BodyPart::LeftAnkle),
    );
    let right_knee_angle = angle_degrees(
        pose.get(BodyPart::RightHip),
        pose.get(BodyPart::RightKnee),
        pose.get(BodyPart::RightAnkle),
    );

    let left_arm_down = (pose.get(BodyPart::LeftWrist).y - pose.get(BodyPart::LeftShoulder).y)
        .abs()
        > ARMS_DOWN_MARGIN;
    let right_arm_down = (pose.get(BodyPart::RightWrist).y - pose.get(BodyPart::RightShoulder).y)
        .abs()
        > ARMS_DOWN_MARGIN;

    left_knee_angle > STANDING_KNEE_ANGLE
        && right_knee_angle > STANDING_KNEE_ANGLE
        && left_arm_down
        && right_arm_down
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    /// 直立した人物（肩幅100px、身長約330px）
    fn standing_pose() -> Pose {
        let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
        let mut set = |part: BodyPart, x: f32, y: f32| {
            keypoints[part as usize] = Keypoint::new(x, y, 0.9);
        };
        set(BodyPart::Nose, 240.0, 100.0);
        set(BodyPart::LeftEye, 230.0, 95.0);
        set(BodyPart::RightEye, 250.0, 95.0);
        set(BodyPart::LeftEar, 220.0, 100.0);
        set(BodyPart::RightEar, 260.0, 100.0);
        set(BodyPart::LeftShoulder, 190.0, 150.0);
        set(BodyPart::RightShoulder, 290.0, 150.0);
        set(BodyPart::LeftElbow, 180.0, 220.0);
        set(BodyPart::RightElbow, 300.0, 220.0);
        set(BodyPart::LeftWrist, 175.0, 290.0);
        set(BodyPart::RightWrist, 305.0, 290.0);
        set(BodyPart::LeftHip, 215.0, 280.0);
        set(BodyPart::RightHip, 265.0, 280.0);
        set(BodyPart::LeftKnee, 215.0, 355.0);
        set(BodyPart::RightKnee, 265.0, 355.0);
        set(BodyPart::LeftAnkle, 215.0, 430.0);
        set(BodyPart::RightAnkle, 265.0, 430.0);
        Pose::new(keypoints, 0.9)
    }

    /// 膝を曲げた人物（立位ゲートを通らない）
    fn bent_knee_pose() -> Pose {
        let mut pose = standing_pose();
        // 膝を大きく前に出して角度を潰す
        pose.keypoints[BodyPart::LeftKnee as usize] = Keypoint::new(165.0, 355.0, 0.9);
        pose.keypoints[BodyPart::RightKnee as usize] = Keypoint::new(315.0, 355.0, 0.9);
        pose
    }

    #[test]
    fn test_first_observation_initializes_directly() {
        let mut calibrator = BaselineCalibrator::new();
        calibrator.observe(&standing_pose());

        let baseline = calibrator.baseline().expect("baseline should exist");
        assert!((baseline.shoulder_width - 100.0).abs() < 1e-3);
        assert!((baseline.height - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_second_observation_blends() {
        let mut calibrator = BaselineCalibrator::new();
        calibrator.observe(&standing_pose());

        // 肩幅120pxの立位フレーム
        let mut wider = standing_pose();
        wider.keypoints[BodyPart::LeftShoulder as usize] = Keypoint::new(180.0, 150.0, 0.9);
        wider.keypoints[BodyPart::RightShoulder as usize] = Keypoint::new(300.0, 150.0, 0.9);
        calibrator.observe(&wider);

        let baseline = calibrator.baseline().unwrap();
        // 100 * 0.7 + 120 * 0.3 = 106
        assert!(
            (baseline.shoulder_width - 106.0).abs() < 1e-3,
            "shoulder={}",
            baseline.shoulder_width
        );
    }

    #[test]
    fn test_bent_knees_do_not_update() {
        let mut calibrator = BaselineCalibrator::new();
        calibrator.observe(&bent_knee_pose());
        assert!(calibrator.baseline().is_none());
    }

    #[test]
    fn test_raised_arms_do_not_update() {
        let mut calibrator = BaselineCalibrator::new();
        let mut raised = standing_pose();
        // 手首を肩の高さに
        raised.keypoints[BodyPart::LeftWrist as usize] = Keypoint::new(140.0, 155.0, 0.9);
        raised.keypoints[BodyPart::RightWrist as usize] = Keypoint::new(340.0, 155.0, 0.9);
        calibrator.observe(&raised);
        assert!(calibrator.baseline().is_none());
    }

    #[test]
    fn test_reference_falls_back_to_frame() {
        let calibrator = BaselineCalibrator::new();
        let reference = calibrator.reference(&standing_pose());
        assert!((reference.shoulder_width - 100.0).abs() < 1e-3);
        assert!((reference.height - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_reference_clamps_degenerate_frame() {
        let calibrator = BaselineCalibrator::new();
        let reference = calibrator.reference(&Pose::default());
        // 全キーポイントが原点でもゼロ除算しない
        assert!(reference.shoulder_width >= 1.0);
        assert!(reference.height >= 1.0);
    }

    #[test]
    fn test_reference_prefers_baseline() {
        let mut calibrator = BaselineCalibrator::new();
        calibrator.observe(&standing_pose());

        // 別の体格のフレームを渡しても基準値を返す
        let mut other = standing_pose();
        other.keypoints[BodyPart::LeftShoulder as usize] = Keypoint::new(200.0, 150.0, 0.9);
        other.keypoints[BodyPart::RightShoulder as usize] = Keypoint::new(280.0, 150.0, 0.9);
        let reference = calibrator.reference(&other);
        assert!((reference.shoulder_width - 100.0).abs() < 1e-3);
    }
}
