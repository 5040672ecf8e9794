use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::classify::{Action, ActionResult};
use crate::config::AnnounceConfig;

/// 読み上げテキストのデバウンス選択
///
/// 安定化済みの結果をさらに短い履歴で確認し、同じ動作を最小間隔内に
/// 繰り返し読み上げない。実際の音声合成は外部コラボレータの仕事で、
/// ここは「いま何を言うべきか」だけを決める
pub struct Announcer {
    interval: Duration,
    history_size: usize,
    min_agree: usize,
    history: VecDeque<Action>,
    last_action: Option<Action>,
    last_spoken_at: Option<Instant>,
}

impl Announcer {
    pub fn new(interval: Duration, history_size: usize, min_agree: usize) -> Self {
        Self {
            interval,
            history_size,
            min_agree,
            history: VecDeque::with_capacity(history_size),
            last_action: None,
            last_spoken_at: None,
        }
    }

    pub fn from_config(config: &AnnounceConfig) -> Self {
        Self::new(
            Duration::from_millis(config.interval_ms),
            config.history_size,
            config.min_agree,
        )
    }

    /// 1ティック分の安定化済み結果を与え、読み上げ文があれば返す
    pub fn update(&mut self, result: &ActionResult, now: Instant) -> Option<String> {
        self.history.push_back(result.action);
        if self.history.len() > self.history_size {
            self.history.pop_front();
        }
        // 履歴が埋まるまでは黙る
        if self.history.len() < self.history_size {
            return None;
        }

        let (action, count) = {
            let mut top = Action::Unknown;
            let mut top_count = 0;
            for &candidate in self.history.iter() {
                let c = self.history.iter().filter(|&&a| a == candidate).count();
                if c > top_count {
                    top = candidate;
                    top_count = c;
                }
            }
            (top, top_count)
        };

        if count < self.min_agree || action == Action::Unknown {
            return None;
        }

        // 同じ動作は最小間隔が明けるまで繰り返さない
        if let (Some(last), Some(at)) = (self.last_action, self.last_spoken_at) {
            if last == action && now.duration_since(at) < self.interval {
                return None;
            }
        }

        let mut text = format!("現在の動作は{}", action.display_name());
        for correction in &result.corrections {
            text.push('。');
            text.push_str(correction);
        }

        self.last_action = Some(action);
        self.last_spoken_at = Some(now);
        Some(text)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_action = None;
        self.last_spoken_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcer() -> Announcer {
        Announcer::new(Duration::from_millis(2000), 5, 4)
    }

    fn stable(action: Action) -> ActionResult {
        ActionResult::new(action, 0.8)
    }

    #[test]
    fn test_silent_until_history_filled() {
        let mut a = announcer();
        let t0 = Instant::now();
        for _ in 0..4 {
            assert!(a.update(&stable(Action::Squatting), t0).is_none());
        }
        let text = a.update(&stable(Action::Squatting), t0);
        assert!(text.is_some());
        assert!(text.unwrap().contains("スクワット"));
    }

    #[test]
    fn test_does_not_repeat_within_interval() {
        let mut a = announcer();
        let t0 = Instant::now();
        for _ in 0..5 {
            a.update(&stable(Action::Standing), t0);
        }
        // 間隔内の同一動作は黙る
        let t1 = t0 + Duration::from_millis(500);
        assert!(a.update(&stable(Action::Standing), t1).is_none());

        // 間隔が明けたら再度読み上げ
        let t2 = t0 + Duration::from_millis(2500);
        assert!(a.update(&stable(Action::Standing), t2).is_some());
    }

    #[test]
    fn test_announces_change_immediately() {
        let mut a = announcer();
        let t0 = Instant::now();
        for _ in 0..5 {
            a.update(&stable(Action::Standing), t0);
        }
        // 動作が変わって履歴の多数を占めたら、間隔内でも読み上げる
        let t1 = t0 + Duration::from_millis(600);
        let mut text = None;
        for _ in 0..5 {
            if let Some(t) = a.update(&stable(Action::JumpingJack), t1) {
                text = Some(t);
            }
        }
        let text = text.expect("change should be announced");
        assert!(text.contains("ジャンピングジャック"));
    }

    #[test]
    fn test_unknown_is_never_announced() {
        let mut a = announcer();
        let t0 = Instant::now();
        for _ in 0..10 {
            assert!(a.update(&stable(Action::Unknown), t0).is_none());
        }
    }

    #[test]
    fn test_corrections_are_appended() {
        let mut a = announcer();
        let t0 = Instant::now();
        let result = ActionResult::with_corrections(
            Action::Squatting,
            0.8,
            vec!["腰をさらに落として股関節を折ってください".to_string()],
        );
        let mut text = None;
        for _ in 0..5 {
            text = a.update(&result, t0);
        }
        let text = text.unwrap();
        assert!(text.contains("腰をさらに落として"));
    }
}
