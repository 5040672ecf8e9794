use anyhow::Result;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use kamae_coach::config::Config;
use kamae_coach::osc::CoachClient;
use kamae_coach::pipeline::{Pipeline, RefreshLimiter, TickResult};
use kamae_coach::pose::{BodyPart, Keypoint, Pose};

const CONFIG_PATH: &str = "config.toml";
/// 合成シーケンスのティック間隔（約30fps相当）
const TICK: Duration = Duration::from_millis(33);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Kamae Coach ({}) - 合成シーケンスデモ ===", env!("GIT_VERSION"));
    if config.osc.enabled {
        println!("OSC送信先: {}", config.osc.addr);
    }
    println!();
    println!("コマンド:");
    println!("  s   - スクワット3回");
    println!("  j   - ジャンピングジャック3回");
    println!("  h   - 騎馬立ちホールド");
    println!("  q   - 終了");
    println!();

    let client = if config.osc.enabled {
        Some(CoachClient::new(&config.osc.addr)?)
    } else {
        None
    };
    let mut pipeline = Pipeline::from_config(&config);
    let mut limiter = RefreshLimiter::new(config.ui.max_fps);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim() {
            "s" => run_reps(&mut pipeline, &mut limiter, client.as_ref(), &squat_pose(), 3)?,
            "j" => run_reps(
                &mut pipeline,
                &mut limiter,
                client.as_ref(),
                &jumping_jack_pose(),
                3,
            )?,
            "h" => run_hold(&mut pipeline, &mut limiter, client.as_ref(), &horse_stance_pose())?,
            "q" => {
                println!("終了します");
                break;
            }
            "" => continue,
            other => {
                println!("不明なコマンド: {}", other);
            }
        }
    }

    Ok(())
}

/// 立位→目標姿勢→立位 をくり返す
fn run_reps(
    pipeline: &mut Pipeline,
    limiter: &mut RefreshLimiter,
    client: Option<&CoachClient>,
    target: &Pose,
    reps: u32,
) -> Result<()> {
    let standing = standing_pose();
    for rep in 1..=reps {
        println!("--- {}回目 ---", rep);
        // 下降
        for step in 0..=6 {
            let pose = blend_pose(&standing, target, step as f32 / 6.0);
            tick(pipeline, limiter, client, &pose)?;
        }
        // 保持
        for _ in 0..8 {
            tick(pipeline, limiter, client, target)?;
        }
        // 復帰
        for step in 0..=6 {
            let pose = blend_pose(target, &standing, step as f32 / 6.0);
            tick(pipeline, limiter, client, &pose)?;
        }
        for _ in 0..6 {
            tick(pipeline, limiter, client, &standing)?;
        }
    }
    Ok(())
}

/// 目標姿勢に入ってしばらく保持する
fn run_hold(
    pipeline: &mut Pipeline,
    limiter: &mut RefreshLimiter,
    client: Option<&CoachClient>,
    target: &Pose,
) -> Result<()> {
    let standing = standing_pose();
    for step in 0..=6 {
        let pose = blend_pose(&standing, target, step as f32 / 6.0);
        tick(pipeline, limiter, client, &pose)?;
    }
    for _ in 0..30 {
        tick(pipeline, limiter, client, target)?;
    }
    for step in 0..=6 {
        let pose = blend_pose(target, &standing, step as f32 / 6.0);
        tick(pipeline, limiter, client, &pose)?;
    }
    Ok(())
}

fn tick(
    pipeline: &mut Pipeline,
    limiter: &mut RefreshLimiter,
    client: Option<&CoachClient>,
    pose: &Pose,
) -> Result<()> {
    let now = Instant::now();
    let result = pipeline.process(std::slice::from_ref(pose), now);

    if let Some(c) = client {
        for (slot, subject) in result.subjects.iter().enumerate() {
            c.send(slot as i32, &subject.stable, &subject.counts)?;
        }
    }

    if limiter.should_refresh(now) {
        print_tick(&result);
    }

    std::thread::sleep(TICK);
    Ok(())
}

fn print_tick(result: &TickResult) {
    if let Some(subject) = result.subjects.first() {
        let stable = &subject.stable;
        print!(
            "  {} ({:.0}%)  スクワット:{} ジャンピングジャック:{}",
            stable.action.display_name(),
            stable.confidence * 100.0,
            subject.counts.squats,
            subject.counts.jumping_jacks,
        );
        if let Some(hint) = stable.corrections.first() {
            print!("  [{}]", hint);
        }
        println!();
    }
    if let Some(text) = &result.announcement {
        println!("  読み上げ: {}", text);
    }
}

/// キーポイントごとの線形補間（信頼度は低い方を採用）
fn blend_pose(a: &Pose, b: &Pose, t: f32) -> Pose {
    let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
    for (index, kp) in keypoints.iter_mut().enumerate() {
        let ka = &a.keypoints[index];
        let kb = &b.keypoints[index];
        *kp = Keypoint::new(
            ka.x + (kb.x - ka.x) * t,
            ka.y + (kb.y - ka.y) * t,
            ka.confidence.min(kb.confidence),
        );
    }
    Pose::new(keypoints, a.score.min(b.score))
}

fn make_pose(parts: &[(BodyPart, f32, f32)]) -> Pose {
    let mut keypoints = [Keypoint::default(); BodyPart::COUNT];
    for &(part, x, y) in parts {
        keypoints[part as usize] = Keypoint::new(x, y, 0.9);
    }
    Pose::new(keypoints, 0.9)
}

fn standing_pose() -> Pose {
    make_pose(&[
        (BodyPart::Nose, 240.0, 100.0),
        (BodyPart::LeftEye, 230.0, 95.0),
        (BodyPart::RightEye, 250.0, 95.0),
        (BodyPart::LeftEar, 220.0, 100.0),
        (BodyPart::RightEar, 260.0, 100.0),
        (BodyPart::LeftShoulder, 190.0, 160.0),
        (BodyPart::RightShoulder, 290.0, 160.0),
        (BodyPart::LeftElbow, 180.0, 240.0),
        (BodyPart::RightElbow, 300.0, 240.0),
        (BodyPart::LeftWrist, 175.0, 320.0),
        (BodyPart::RightWrist, 305.0, 320.0),
        (BodyPart::LeftHip, 220.0, 320.0),
        (BodyPart::RightHip, 260.0, 320.0),
        (BodyPart::LeftKnee, 220.0, 448.0),
        (BodyPart::RightKnee, 260.0, 448.0),
        (BodyPart::LeftAnkle, 220.0, 576.0),
        (BodyPart::RightAnkle, 260.0, 576.0),
    ])
}

fn squat_pose() -> Pose {
    make_pose(&[
        (BodyPart::Nose, 240.0, 150.0),
        (BodyPart::LeftEye, 230.0, 145.0),
        (BodyPart::RightEye, 250.0, 145.0),
        (BodyPart::LeftEar, 220.0, 150.0),
        (BodyPart::RightEar, 260.0, 150.0),
        (BodyPart::LeftShoulder, 190.0, 180.0),
        (BodyPart::RightShoulder, 290.0, 180.0),
        (BodyPart::LeftElbow, 180.0, 250.0),
        (BodyPart::RightElbow, 300.0, 250.0),
        (BodyPart::LeftWrist, 170.0, 330.0),
        (BodyPart::RightWrist, 310.0, 330.0),
        (BodyPart::LeftHip, 230.0, 320.0),
        (BodyPart::RightHip, 250.0, 320.0),
        (BodyPart::LeftKnee, 190.0, 320.0),
        (BodyPart::RightKnee, 290.0, 320.0),
        (BodyPart::LeftAnkle, 190.0, 400.0),
        (BodyPart::RightAnkle, 290.0, 400.0),
    ])
}

fn jumping_jack_pose() -> Pose {
    make_pose(&[
        (BodyPart::Nose, 240.0, 96.0),
        (BodyPart::LeftEye, 230.0, 90.0),
        (BodyPart::RightEye, 250.0, 90.0),
        (BodyPart::LeftEar, 220.0, 96.0),
        (BodyPart::RightEar, 260.0, 96.0),
        (BodyPart::LeftShoulder, 170.0, 160.0),
        (BodyPart::RightShoulder, 310.0, 160.0),
        (BodyPart::LeftElbow, 170.0, 64.0),
        (BodyPart::RightElbow, 310.0, 64.0),
        (BodyPart::LeftWrist, 170.0, 13.0),
        (BodyPart::RightWrist, 310.0, 13.0),
        (BodyPart::LeftHip, 180.0, 320.0),
        (BodyPart::RightHip, 300.0, 320.0),
        (BodyPart::LeftKnee, 134.0, 448.0),
        (BodyPart::RightKnee, 346.0, 448.0),
        (BodyPart::LeftAnkle, 134.0, 576.0),
        (BodyPart::RightAnkle, 346.0, 576.0),
    ])
}

fn horse_stance_pose() -> Pose {
    make_pose(&[
        (BodyPart::Nose, 240.0, 100.0),
        (BodyPart::LeftEye, 230.0, 95.0),
        (BodyPart::RightEye, 250.0, 95.0),
        (BodyPart::LeftEar, 220.0, 100.0),
        (BodyPart::RightEar, 260.0, 100.0),
        (BodyPart::LeftShoulder, 205.0, 150.0),
        (BodyPart::RightShoulder, 275.0, 150.0),
        (BodyPart::LeftElbow, 200.0, 210.0),
        (BodyPart::RightElbow, 280.0, 210.0),
        (BodyPart::LeftWrist, 198.0, 265.0),
        (BodyPart::RightWrist, 282.0, 265.0),
        (BodyPart::LeftHip, 215.0, 290.0),
        (BodyPart::RightHip, 265.0, 290.0),
        (BodyPart::LeftKnee, 189.1, 365.7),
        (BodyPart::RightKnee, 290.9, 365.7),
        (BodyPart::LeftAnkle, 304.4, 476.6),
        (BodyPart::RightAnkle, 175.6, 476.6),
    ])
}
