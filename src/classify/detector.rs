use tracing::debug;

use crate::classify::baseline::Reference;
use crate::classify::score::{score_over_head, score_range};
use crate::classify::{Action, ActionResult};
use crate::config::ClassifyConfig;
use crate::pose::{angle_degrees, BodyPart, Pose};

/// 手首・肘が肩と「同じ高さ」とみなす縦マージン (px)
const ARM_HORIZONTAL_MARGIN: f32 = 40.0;
const ELBOW_HORIZONTAL_MARGIN: f32 = 50.0;
/// 腕が横に「伸びている」とみなす肩幅比
const ARM_EXTENDED_RATIO: f32 = 0.8;
/// 頭上判定に使う基準身長比のマージン
const OVERHEAD_MARGIN_RATIO: f32 = 0.05;

/// 幾何特徴からの規則ベース動作分類器
///
/// 状態を持たない純粋関数として毎フレーム呼べる。すべての失敗は
/// Unknown という値で返り、例外的な経路は存在しない
pub struct ActionDetector {
    config: ClassifyConfig,
}

impl ActionDetector {
    pub fn new() -> Self {
        Self {
            config: ClassifyConfig::default(),
        }
    }

    pub fn from_config(config: &ClassifyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 1フレームの姿勢を判定する
    pub fn detect(&self, pose: &Pose, reference: &Reference) -> ActionResult {
        // 構造ゲート: 確信できるキーポイントが足りなければ判定しない
        if pose.valid_count(self.config.valid_confidence) < self.config.min_valid_keypoints {
            return ActionResult::unknown();
        }

        // 下肢ゲート: スクワット/騎馬立ち/立位の判別には脚が必須。
        // 見えていないときは推測せず判定拒否
        let left_ankle = pose.get(BodyPart::LeftAnkle);
        let right_ankle = pose.get(BodyPart::RightAnkle);
        let left_knee = pose.get(BodyPart::LeftKnee);
        let right_knee = pose.get(BodyPart::RightKnee);
        if left_ankle.confidence < self.config.ankle_confidence
            || right_ankle.confidence < self.config.ankle_confidence
            || left_knee.confidence < self.config.knee_confidence
            || right_knee.confidence < self.config.knee_confidence
        {
            return ActionResult::unknown_with("下半身のキーポイントの信頼度が足りません");
        }

        let f = Features::extract(pose, reference);
        debug!(
            shoulder_width = f.shoulder_width,
            hip_width = f.hip_width,
            ankle_width = f.ankle_width,
            knee_width = f.knee_width,
            total_height = f.total_height,
            "frame features"
        );

        let min_knee_angle = f.left_knee_angle.min(f.right_knee_angle);
        let min_hip_angle = f.left_hip_angle.min(f.right_hip_angle);

        // ジャンピングジャック（評点制）
        let leg_spread_score = if f.leg_spread_ratio >= 1.22 {
            1.0
        } else if f.leg_spread_ratio >= 1.12 {
            0.6
        } else {
            0.0
        };
        let leg_straight_score = ((min_knee_angle - 130.0) / 40.0).clamp(0.0, 1.0);
        let jj_score = f.overhead_score + leg_spread_score + leg_straight_score;
        let is_jumping_jack = f.overhead_score >= 0.65
            && f.wrists_above_shoulder
            && f.leg_spread_ratio >= 1.12
            && jj_score >= 2.1;

        // スクワット（評点制）: 脚が広すぎず、膝が曲がり、股関節が折れている
        let is_narrow = f.leg_spread_ratio < 1.12;
        let squat_width_score = score_range(f.leg_spread_ratio, 1.0, 1.18, 0.08, true);
        let squat_knee_score = score_range(min_knee_angle, 55.0, 130.0, 16.0, true);
        let squat_hip_score = score_range(min_hip_angle, 115.0, 150.0, 10.0, true);
        let squat_score = squat_width_score + squat_knee_score + squat_hip_score;
        let is_squatting = is_narrow && squat_score >= 1.75;

        // 騎馬立ち（評点制）: スクワットらしいフレームには譲る
        let horse_spread_score = if f.leg_spread_ratio >= 1.24 {
            1.0
        } else if f.leg_spread_ratio >= 1.14 {
            0.6
        } else {
            0.0
        };
        let horse_knee_score = score_range(min_knee_angle, 88.0, 120.0, 6.0, false);
        let horse_hip_score = score_range(min_hip_angle, 158.0, 178.0, 6.0, false);
        let horse_align_score = score_range(
            (f.left_knee_y - f.right_knee_y).abs(),
            0.0,
            reference.height * 0.10,
            reference.height * 0.05,
            true,
        );
        let horse_depth_score = score_range(
            (f.ankle_y - f.knee_y) / reference.height,
            0.18,
            0.30,
            0.04,
            false,
        );
        let horse_score = horse_spread_score
            + horse_knee_score
            + horse_hip_score
            + horse_align_score
            + horse_depth_score;
        let squat_gate_strong =
            squat_width_score > 0.65 && squat_knee_score > 0.65 && squat_hip_score > 0.65;
        let squat_likely = squat_score >= 1.6 || squat_gate_strong;
        let arms_down = !f.wrists_above_shoulder && f.overhead_score < 0.4;
        let horse_hard_gate = arms_down
            && f.leg_spread_ratio >= 1.16
            && horse_knee_score > 0.40
            && horse_hip_score > 0.40
            && horse_depth_score > 0.40;
        let is_horse_stance = horse_hard_gate && horse_score >= 2.3 && !squat_likely;

        // 両腕水平挙上（ハードゲート）
        let is_arms_extended = f.left_arm_horizontal
            && f.right_arm_horizontal
            && f.left_arm_extended
            && f.right_arm_extended
            && (f.left_elbow_y - f.left_shoulder_y).abs() < ELBOW_HORIZONTAL_MARGIN
            && (f.right_elbow_y - f.right_shoulder_y).abs() < ELBOW_HORIZONTAL_MARGIN;

        // 立位（ハードゲート）: 膝と腰が伸びていて腕を水平に上げていない
        let is_standing = f.left_knee_angle > 160.0
            && f.right_knee_angle > 160.0
            && f.left_hip_angle > 160.0
            && f.right_hip_angle > 160.0
            && !f.left_arm_horizontal
            && !f.right_arm_horizontal;

        debug!(
            jj = jj_score,
            horse = horse_score,
            squat = squat_score,
            "composite scores"
        );

        // 優先順位: JJ > 騎馬立ち > スクワット > 水平挙上 > 立位 > 不明
        if is_jumping_jack {
            let mut corrections = Vec::new();
            if !f.wrists_above_shoulder {
                corrections.push("両手を肩より上まで挙げてから続けてください".to_string());
            } else if f.overhead_score < 1.0 {
                corrections.push("両手を頭の真上に近づけてください".to_string());
            }
            if leg_spread_score < 1.0 {
                corrections.push("両足をもう少し開いてください".to_string());
            }
            if leg_straight_score < 0.8 {
                corrections.push("両脚をできるだけ伸ばしてください".to_string());
            }
            ActionResult::with_corrections(
                Action::JumpingJack,
                (0.6 + jj_score * 0.15).min(0.95),
                corrections,
            )
        } else if is_horse_stance {
            let mut corrections = Vec::new();
            if horse_spread_score < 1.0 {
                corrections.push("両足をもう少し開いてください".to_string());
            }
            if horse_knee_score < 1.0 {
                corrections.push("膝を直角に近づけるまで曲げてください".to_string());
            }
            if horse_hip_score < 1.0 {
                corrections.push("上体をまっすぐ起こしてください".to_string());
            }
            if horse_align_score < 0.8 {
                corrections.push("左右の膝の高さを揃えてください".to_string());
            }
            ActionResult::with_corrections(
                Action::HorseStance,
                (0.6 + horse_score * 0.15).min(0.95),
                corrections,
            )
        } else if is_squatting {
            let mut corrections = Vec::new();
            if (f.left_knee_angle - f.right_knee_angle).abs() > 20.0 {
                corrections.push("左右の脚の曲げ具合を揃えてください".to_string());
            }
            if squat_width_score < 0.8 {
                corrections.push("足幅が広すぎます。少し狭めてください".to_string());
            }
            if squat_hip_score < 0.8 {
                corrections.push("腰をさらに落として股関節を折ってください".to_string());
            }
            ActionResult::with_corrections(
                Action::Squatting,
                (0.6 + squat_score * 0.15).min(0.9),
                corrections,
            )
        } else if is_arms_extended {
            let mut corrections = Vec::new();
            if (f.left_wrist_y - f.right_wrist_y).abs() > 30.0 {
                corrections.push("両手を同じ高さに保ってください".to_string());
            }
            if (f.left_shoulder_y - f.right_shoulder_y).abs() > 20.0 {
                corrections.push("肩を水平に保ってください".to_string());
            }
            if (f.left_wrist_y - f.left_shoulder_y).abs() > 50.0 {
                corrections.push("腕をもっと水平にしてください".to_string());
            }
            if (f.right_wrist_y - f.right_shoulder_y).abs() > 50.0 {
                corrections.push("腕をもっと水平にしてください".to_string());
            }
            ActionResult::with_corrections(Action::ArmsExtended, 0.90, corrections)
        } else if is_standing {
            let mut corrections = Vec::new();
            if (f.left_knee_y - f.right_knee_y).abs() > 30.0 {
                corrections.push("両脚を同じ高さに保ってください".to_string());
            }
            if (f.left_hip_y - f.right_hip_y).abs() > 20.0 {
                corrections.push("腰を水平に保ってください".to_string());
            }
            if f.torso_length < 50.0 {
                corrections.push("背筋を伸ばしてください".to_string());
            }
            ActionResult::with_corrections(Action::Standing, 0.90, corrections)
        } else {
            ActionResult::unknown_with("姿勢が基準と合っていません。動作を調整してください")
        }
    }
}

impl Default for ActionDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// 分類に使う幾何特徴量（1フレーム分）
struct Features {
    shoulder_width: f32,
    hip_width: f32,
    ankle_width: f32,
    knee_width: f32,
    torso_length: f32,
    total_height: f32,
    /// 足首間隔の基準肩幅比
    leg_spread_ratio: f32,
    /// 頭上スコア (score_over_head)
    overhead_score: f32,
    wrists_above_shoulder: bool,
    left_knee_angle: f32,
    right_knee_angle: f32,
    left_hip_angle: f32,
    right_hip_angle: f32,
    left_arm_horizontal: bool,
    right_arm_horizontal: bool,
    left_arm_extended: bool,
    right_arm_extended: bool,
    left_shoulder_y: f32,
    right_shoulder_y: f32,
    left_wrist_y: f32,
    right_wrist_y: f32,
    left_elbow_y: f32,
    right_elbow_y: f32,
    left_hip_y: f32,
    right_hip_y: f32,
    left_knee_y: f32,
    right_knee_y: f32,
    /// 左右平均の膝・足首Y（騎馬立ちの沈み込み評価用）
    knee_y: f32,
    ankle_y: f32,
}

impl Features {
    fn extract(pose: &Pose, reference: &Reference) -> Self {
        let left_shoulder = pose.get(BodyPart::LeftShoulder);
        let right_shoulder = pose.get(BodyPart::RightShoulder);
        let left_wrist = pose.get(BodyPart::LeftWrist);
        let right_wrist = pose.get(BodyPart::RightWrist);
        let left_elbow = pose.get(BodyPart::LeftElbow);
        let right_elbow = pose.get(BodyPart::RightElbow);
        let left_hip = pose.get(BodyPart::LeftHip);
        let right_hip = pose.get(BodyPart::RightHip);
        let left_knee = pose.get(BodyPart::LeftKnee);
        let right_knee = pose.get(BodyPart::RightKnee);
        let left_ankle = pose.get(BodyPart::LeftAnkle);
        let right_ankle = pose.get(BodyPart::RightAnkle);
        let nose = pose.get(BodyPart::Nose);

        let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
        let wrist_y = (left_wrist.y + right_wrist.y) / 2.0;
        let hip_y = (left_hip.y + right_hip.y) / 2.0;
        let knee_y = (left_knee.y + right_knee.y) / 2.0;
        let ankle_y = (left_ankle.y + right_ankle.y) / 2.0;

        let shoulder_width = (right_shoulder.x - left_shoulder.x).abs();
        let hip_width = (right_hip.x - left_hip.x).abs();
        let ankle_width = (right_ankle.x - left_ankle.x).abs();
        let knee_width = (right_knee.x - left_knee.x).abs();
        let torso_length = hip_y - shoulder_y;
        let total_height = nose.y.max(left_ankle.y).max(right_ankle.y)
            - nose.y.min(left_shoulder.y).min(right_shoulder.y);

        let overhead_margin = reference.height * OVERHEAD_MARGIN_RATIO;
        let wrists_above_shoulder =
            left_wrist.y < shoulder_y - overhead_margin && right_wrist.y < shoulder_y - overhead_margin;
        let overhead_score = score_over_head(wrist_y, shoulder_y, nose.y, reference.height);

        Self {
            shoulder_width,
            hip_width,
            ankle_width,
            knee_width,
            torso_length,
            total_height,
            leg_spread_ratio: ankle_width / reference.shoulder_width,
            overhead_score,
            wrists_above_shoulder,
            left_knee_angle: angle_degrees(left_hip, left_knee, left_ankle),
            right_knee_angle: angle_degrees(right_hip, right_knee, right_ankle),
            left_hip_angle: angle_degrees(left_shoulder, left_hip, left_knee),
            right_hip_angle: angle_degrees(right_shoulder, right_hip, right_knee),
            left_arm_horizontal: (left_wrist.y - left_shoulder.y).abs() < ARM_HORIZONTAL_MARGIN,
            right_arm_horizontal: (right_wrist.y - right_shoulder.y).abs() < ARM_HORIZONTAL_MARGIN,
            left_arm_extended: (left_wrist.x - left_shoulder.x).abs()
                > shoulder_width * ARM_EXTENDED_RATIO,
            right_arm_extended: (right_wrist.x - right_shoulder.x).abs()
                > shoulder_width * ARM_EXTENDED_RATIO,
            left_shoulder_y: left_shoulder.y,
            right_shoulder_y: right_shoulder.y,
            left_wrist_y: left_wrist.y,
            right_wrist_y: right_wrist.y,
            left_elbow_y: left_elbow.y,
            right_elbow_y: right_elbow.y,
            left_hip_y: left_hip.y,
            right_hip_y: right_hip.y,
            left_knee_y: left_knee.y,
            right_knee_y: right_knee.y,
            knee_y,
            ankle_y,
        }
    }
}
