use crate::classify::Action;
use crate::pose::{BodyPart, Keypoint, Pose};

/// 標準姿勢テンプレート
///
/// オーバーレイに「お手本」の骨格を描くためのキーポイント列を、
/// 指定した描画領域サイズにスケールして返す。
/// テンプレートにない部位は信頼度0のまま（描画側でスキップされる）
pub fn reference_pose(action: Action, width: f32, height: f32) -> Pose {
    match action {
        Action::Squatting => squatting(width, height),
        Action::JumpingJack => jumping_jack(width, height),
        Action::HorseStance => horse_stance(width, height),
        Action::ArmsExtended => arms_extended(width, height),
        Action::ArmsRaised => arms_raised(width, height),
        Action::HandsOnHips => hands_on_hips(width, height),
        Action::ArmsCrossed => arms_crossed(width, height),
        _ => standing(width, height),
    }
}

fn build(parts: &[(BodyPart, f32, f32)]) -> Pose {
    let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
    for &(part, x, y) in parts {
        keypoints[part as usize] = Keypoint::new(x, y, 1.0);
    }
    Pose::new(keypoints, 1.0)
}

fn standing(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::Nose, cx, height * 0.15),
        (BodyPart::LeftEye, cx - 20.0, height * 0.12),
        (BodyPart::RightEye, cx + 20.0, height * 0.12),
        (BodyPart::LeftEar, cx - 40.0, height * 0.14),
        (BodyPart::RightEar, cx + 40.0, height * 0.14),
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.25),
        (BodyPart::LeftElbow, cx - 90.0, height * 0.40),
        (BodyPart::RightElbow, cx + 90.0, height * 0.40),
        (BodyPart::LeftWrist, cx - 90.0, height * 0.55),
        (BodyPart::RightWrist, cx + 90.0, height * 0.55),
        (BodyPart::LeftHip, cx - 50.0, height * 0.50),
        (BodyPart::RightHip, cx + 50.0, height * 0.50),
        (BodyPart::LeftKnee, cx - 50.0, height * 0.70),
        (BodyPart::RightKnee, cx + 50.0, height * 0.70),
        (BodyPart::LeftAnkle, cx - 50.0, height * 0.90),
        (BodyPart::RightAnkle, cx + 50.0, height * 0.90),
    ])
}

fn squatting(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::Nose, cx, height * 0.35),
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.40),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.40),
        (BodyPart::LeftElbow, cx - 70.0, height * 0.50),
        (BodyPart::RightElbow, cx + 70.0, height * 0.50),
        (BodyPart::LeftWrist, cx - 70.0, height * 0.60),
        (BodyPart::RightWrist, cx + 70.0, height * 0.60),
        (BodyPart::LeftHip, cx - 50.0, height * 0.55),
        (BodyPart::RightHip, cx + 50.0, height * 0.55),
        (BodyPart::LeftKnee, cx - 50.0, height * 0.65),
        (BodyPart::RightKnee, cx + 50.0, height * 0.65),
        (BodyPart::LeftAnkle, cx - 50.0, height * 0.75),
        (BodyPart::RightAnkle, cx + 50.0, height * 0.75),
    ])
}

fn jumping_jack(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    let spread = width * 0.22;
    build(&[
        (BodyPart::Nose, cx, height * 0.15),
        (BodyPart::LeftShoulder, cx - 70.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 70.0, height * 0.25),
        (BodyPart::LeftElbow, cx - 70.0, height * 0.10),
        (BodyPart::RightElbow, cx + 70.0, height * 0.10),
        (BodyPart::LeftWrist, cx - 70.0, height * 0.02),
        (BodyPart::RightWrist, cx + 70.0, height * 0.02),
        (BodyPart::LeftHip, cx - 60.0, height * 0.50),
        (BodyPart::RightHip, cx + 60.0, height * 0.50),
        (BodyPart::LeftKnee, cx - spread, height * 0.70),
        (BodyPart::RightKnee, cx + spread, height * 0.70),
        (BodyPart::LeftAnkle, cx - spread, height * 0.90),
        (BodyPart::RightAnkle, cx + spread, height * 0.90),
    ])
}

fn horse_stance(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    let spread = width * 0.20;
    build(&[
        (BodyPart::Nose, cx, height * 0.18),
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.28),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.28),
        (BodyPart::LeftElbow, cx - 80.0, height * 0.40),
        (BodyPart::RightElbow, cx + 80.0, height * 0.40),
        (BodyPart::LeftWrist, cx - 70.0, height * 0.50),
        (BodyPart::RightWrist, cx + 70.0, height * 0.50),
        (BodyPart::LeftHip, cx - 70.0, height * 0.55),
        (BodyPart::RightHip, cx + 70.0, height * 0.55),
        (BodyPart::LeftKnee, cx - spread, height * 0.70),
        (BodyPart::RightKnee, cx + spread, height * 0.70),
        (BodyPart::LeftAnkle, cx - spread, height * 0.90),
        (BodyPart::RightAnkle, cx + spread, height * 0.90),
    ])
}

fn arms_extended(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.25),
        (BodyPart::LeftElbow, cx - 150.0, height * 0.25),
        (BodyPart::RightElbow, cx + 150.0, height * 0.25),
        (BodyPart::LeftWrist, cx - 250.0, height * 0.25),
        (BodyPart::RightWrist, cx + 250.0, height * 0.25),
        (BodyPart::LeftHip, cx - 50.0, height * 0.50),
        (BodyPart::RightHip, cx + 50.0, height * 0.50),
        (BodyPart::LeftKnee, cx - 50.0, height * 0.70),
        (BodyPart::RightKnee, cx + 50.0, height * 0.70),
        (BodyPart::LeftAnkle, cx - 50.0, height * 0.90),
        (BodyPart::RightAnkle, cx + 50.0, height * 0.90),
    ])
}

fn arms_raised(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.25),
        (BodyPart::LeftElbow, cx - 60.0, height * 0.10),
        (BodyPart::RightElbow, cx + 60.0, height * 0.10),
        (BodyPart::LeftWrist, cx - 60.0, height * 0.02),
        (BodyPart::RightWrist, cx + 60.0, height * 0.02),
        (BodyPart::LeftHip, cx - 50.0, height * 0.50),
        (BodyPart::RightHip, cx + 50.0, height * 0.50),
    ])
}

fn hands_on_hips(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.25),
        (BodyPart::LeftElbow, cx - 80.0, height * 0.40),
        (BodyPart::RightElbow, cx + 80.0, height * 0.40),
        (BodyPart::LeftWrist, cx - 50.0, height * 0.50),
        (BodyPart::RightWrist, cx + 50.0, height * 0.50),
        (BodyPart::LeftHip, cx - 50.0, height * 0.50),
        (BodyPart::RightHip, cx + 50.0, height * 0.50),
    ])
}

fn arms_crossed(width: f32, height: f32) -> Pose {
    let cx = width / 2.0;
    build(&[
        (BodyPart::LeftShoulder, cx - 60.0, height * 0.25),
        (BodyPart::RightShoulder, cx + 60.0, height * 0.25),
        (BodyPart::LeftElbow, cx, height * 0.35),
        (BodyPart::RightElbow, cx, height * 0.40),
        (BodyPart::LeftWrist, cx + 40.0, height * 0.40),
        (BodyPart::RightWrist, cx - 40.0, height * 0.45),
        (BodyPart::LeftHip, cx - 50.0, height * 0.50),
        (BodyPart::RightHip, cx + 50.0, height * 0.50),
    ])
}
