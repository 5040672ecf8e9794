use std::collections::HashMap;

use crate::config::SmoothConfig;
use crate::pose::{BodyPart, Keypoint, Pose};

/// キーポイントのEMA平滑化フィルタ（描画用）
///
/// トラックスロットごと・部位ごとに前回の平滑化位置を保持する。
/// 信頼度がフロア未満のサンプルは平均に取り込まず、前回位置を
/// 凍結する（低信頼サンプルへ引き寄せられてのブレを防ぐ）
pub struct PoseSmoother {
    alpha: f32,
    min_confidence: f32,
    prev: HashMap<usize, [Option<(f32, f32)>; BodyPart::COUNT]>,
}

impl PoseSmoother {
    pub fn new(alpha: f32, min_confidence: f32) -> Self {
        Self {
            alpha,
            min_confidence,
            prev: HashMap::new(),
        }
    }

    pub fn from_config(config: &SmoothConfig) -> Self {
        Self::new(config.alpha, config.min_confidence)
    }

    /// 1ティック分の全スロットを平滑化する
    ///
    /// 初観測の部位は生の位置をそのまま採用する。
    /// スロット数が減ったら余剰スロットの状態を破棄する
    pub fn smooth(&mut self, poses: &[Pose]) -> Vec<Pose> {
        if poses.is_empty() {
            return Vec::new();
        }

        let result: Vec<Pose> = poses
            .iter()
            .enumerate()
            .map(|(slot, pose)| {
                let prev_for_slot = self
                    .prev
                    .entry(slot)
                    .or_insert([None; BodyPart::COUNT]);

                let mut keypoints = pose.keypoints;
                for (index, kp) in keypoints.iter_mut().enumerate() {
                    let smoothed = match prev_for_slot[index] {
                        Some(prev) if kp.confidence < self.min_confidence => prev,
                        None => (kp.x, kp.y),
                        Some(prev) => (
                            prev.0 + self.alpha * (kp.x - prev.0),
                            prev.1 + self.alpha * (kp.y - prev.1),
                        ),
                    };
                    prev_for_slot[index] = Some(smoothed);
                    kp.x = smoothed.0;
                    kp.y = smoothed.1;
                }
                Pose::new(keypoints, pose.score)
            })
            .collect();

        // 人数が減った場合は余剰キャッシュを整理
        self.prev.retain(|&slot, _| slot < poses.len());

        result
    }

    /// 全スロットの状態を破棄する
    /// （被写体が保持ウィンドウを超えて見えなくなったときに呼ぶ）
    pub fn reset(&mut self) {
        self.prev.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_with_nose(x: f32, y: f32, confidence: f32) -> Pose {
        let mut keypoints = [Keypoint::new(0.0, 0.0, 0.9); BodyPart::COUNT];
        keypoints[BodyPart::Nose as usize] = Keypoint::new(x, y, confidence);
        Pose::new(keypoints, 0.9)
    }

    fn nose_of(poses: &[Pose]) -> (f32, f32) {
        let kp = poses[0].get(BodyPart::Nose);
        (kp.x, kp.y)
    }

    #[test]
    fn test_first_observation_passthrough() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        let out = smoother.smooth(&[pose_with_nose(100.0, 200.0, 0.9)]);
        assert_eq!(nose_of(&out), (100.0, 200.0));
    }

    #[test]
    fn test_blends_toward_new_sample() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);
        let out = smoother.smooth(&[pose_with_nose(200.0, 100.0, 0.9)]);
        // 100 + 0.3 * (200 - 100) = 130
        let (x, y) = nose_of(&out);
        assert!((x - 130.0).abs() < 1e-4, "x={}", x);
        assert!((y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_low_confidence_freezes() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);
        // 低信頼サンプルは無視して前回位置を保持
        let out = smoother.smooth(&[pose_with_nose(500.0, 500.0, 0.1)]);
        assert_eq!(nose_of(&out), (100.0, 100.0));
    }

    #[test]
    fn test_alternating_confidence_converges() {
        // 信頼度0.1と0.9を交互に入れても生信号のように振動しない
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);

        let mut last_x = 100.0;
        for _ in 0..20 {
            let frozen = smoother.smooth(&[pose_with_nose(500.0, 500.0, 0.1)]);
            assert_eq!(nose_of(&frozen).0, last_x);
            let blended = smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);
            last_x = nose_of(&blended).0;
        }
        // 高信頼サンプル位置に収束している
        assert!((last_x - 100.0).abs() < 1e-3, "x={}", last_x);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);
        smoother.reset();
        let out = smoother.smooth(&[pose_with_nose(300.0, 300.0, 0.9)]);
        // リセット後は初観測扱い
        assert_eq!(nose_of(&out), (300.0, 300.0));
    }

    #[test]
    fn test_shrinking_slots_evicts_state() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        let two = [
            pose_with_nose(100.0, 100.0, 0.9),
            pose_with_nose(400.0, 400.0, 0.9),
        ];
        smoother.smooth(&two);
        // スロット1が消える
        smoother.smooth(&[pose_with_nose(100.0, 100.0, 0.9)]);
        // 復帰したスロット1は初観測扱い（旧状態が漏れない）
        let out = smoother.smooth(&[
            pose_with_nose(100.0, 100.0, 0.9),
            pose_with_nose(250.0, 250.0, 0.9),
        ]);
        let kp = out[1].get(BodyPart::Nose);
        assert_eq!((kp.x, kp.y), (250.0, 250.0));
    }

    #[test]
    fn test_empty_input_returns_empty() {
        let mut smoother = PoseSmoother::new(0.3, 0.2);
        assert!(smoother.smooth(&[]).is_empty());
    }
}
