use std::time::{Duration, Instant};

use crate::classify::Action;
use crate::config::CounterConfig;

/// 種目ごとの完了回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepCounts {
    pub squats: u32,
    pub jumping_jacks: u32,
}

/// クールダウンが明けているか（初回は常に可）
fn cooldown_elapsed(last_counted_at: Option<Instant>, now: Instant, cooldown: Duration) -> bool {
    match last_counted_at {
        Some(at) => now.duration_since(at) >= cooldown,
        None => true,
    }
}

/// スクワット回数カウンタ
///
/// Squatting に入ると進行中フラグを立て、進行中に Standing へ戻った
/// エッジで1回と数える。どちらでもないラベルは進行中を取り消す
/// （中途半端な遷移を数えない）
struct SquatCounter {
    in_progress: bool,
    last_counted_at: Option<Instant>,
    count: u32,
}

impl SquatCounter {
    fn new() -> Self {
        Self {
            in_progress: false,
            last_counted_at: None,
            count: 0,
        }
    }

    fn update(&mut self, action: Action, now: Instant, cooldown: Duration) {
        match action {
            Action::Squatting => {
                self.in_progress = true;
            }
            Action::Standing => {
                if self.in_progress && cooldown_elapsed(self.last_counted_at, now, cooldown) {
                    self.count += 1;
                    self.last_counted_at = Some(now);
                }
                self.in_progress = false;
            }
            _ => {
                self.in_progress = false;
            }
        }
    }
}

/// ジャンピングジャック回数カウンタ
///
/// 開相のラベルに「入った」エッジで1回と数える。ラベルが
/// JumpingJack のまま続くフレームでは数えない
struct JumpingJackCounter {
    last_label: Option<Action>,
    last_counted_at: Option<Instant>,
    count: u32,
}

impl JumpingJackCounter {
    fn new() -> Self {
        Self {
            last_label: None,
            last_counted_at: None,
            count: 0,
        }
    }

    fn update(&mut self, action: Action, now: Instant, cooldown: Duration) {
        if action == Action::JumpingJack
            && self.last_label != Some(Action::JumpingJack)
            && cooldown_elapsed(self.last_counted_at, now, cooldown)
        {
            self.count += 1;
            self.last_counted_at = Some(now);
        }
        self.last_label = Some(action);
    }
}

/// 安定化済みラベル列から回数を数えるエッジ駆動カウンタ
/// （トラックスロットごとに1つ）
///
/// クールダウンは種目ごとの連続カウント間の下限時間。安定化で
/// 取り切れなかった単発ノイズによる二重カウントを吸収する
pub struct RepCounter {
    cooldown: Duration,
    squat: SquatCounter,
    jumping_jack: JumpingJackCounter,
}

impl RepCounter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            squat: SquatCounter::new(),
            jumping_jack: JumpingJackCounter::new(),
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(Duration::from_millis(config.cooldown_ms))
    }

    /// 1ティック分の安定化済みラベルを与える
    pub fn update(&mut self, action: Action, now: Instant) {
        self.squat.update(action, now, self.cooldown);
        self.jumping_jack.update(action, now, self.cooldown);
    }

    pub fn counts(&self) -> RepCounts {
        RepCounts {
            squats: self.squat.count,
            jumping_jacks: self.jumping_jack.count,
        }
    }

    /// 回数と進行状態を明示的にゼロへ戻す
    pub fn reset(&mut self) {
        self.squat = SquatCounter::new();
        self.jumping_jack = JumpingJackCounter::new();
    }
}
