use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::classify::{Action, ActionResult};
use crate::config::StabilizeConfig;

/// スロットごとの安定化状態
struct SlotState {
    /// 直近 window_size 枚の生ラベル
    history: VecDeque<Action>,
    last_stable: Option<ActionResult>,
    last_stable_at: Option<Instant>,
}

impl SlotState {
    fn new(window_size: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(window_size),
            last_stable: None,
            last_stable_at: None,
        }
    }
}

/// ラベル列の安定化フィルタ
///
/// フレームごとの生ラベルはノイズで行き来するため、スライディング
/// ウィンドウの多数決で「安定ラベル」を作る。多数決が崩れた直後も
/// 保持タイムアウト内なら直前の安定結果を出し続け、短時間の検出
/// 落ちで表示が Unknown に戻るのを防ぐ
pub struct ActionStabilizer {
    window_size: usize,
    min_agree: usize,
    hold: Duration,
    states: HashMap<usize, SlotState>,
}

impl ActionStabilizer {
    pub fn new(window_size: usize, min_agree: usize, hold: Duration) -> Self {
        Self {
            window_size,
            min_agree,
            hold,
            states: HashMap::new(),
        }
    }

    pub fn from_config(config: &StabilizeConfig) -> Self {
        Self::new(
            config.window_size,
            config.min_agree,
            Duration::from_millis(config.hold_ms),
        )
    }

    /// 1ティック分の全スロットを処理する
    ///
    /// now はティック開始時に一度だけ取得した単調時刻を渡す。
    /// スロット数が減ったら余剰スロットの状態を破棄する
    pub fn update(&mut self, results: &[ActionResult], now: Instant) -> Vec<ActionResult> {
        let mut output = Vec::with_capacity(results.len());

        for (slot, result) in results.iter().enumerate() {
            let state = self
                .states
                .entry(slot)
                .or_insert_with(|| SlotState::new(self.window_size));

            state.history.push_back(result.action);
            if state.history.len() > self.window_size {
                state.history.pop_front();
            }

            let (majority, count) = majority_of(&state.history);
            let is_stable =
                majority != Action::Unknown && count >= self.min_agree;

            let final_result = if is_stable {
                let stabilized = ActionResult::with_corrections(
                    majority,
                    result.confidence.max(0.8),
                    result.corrections.clone(),
                );
                state.last_stable = Some(stabilized.clone());
                state.last_stable_at = Some(now);
                stabilized
            } else if let (Some(stable), Some(at)) = (&state.last_stable, state.last_stable_at) {
                if now.duration_since(at) <= self.hold {
                    stable.clone()
                } else {
                    result.clone()
                }
            } else {
                result.clone()
            };

            output.push(final_result);
        }

        // 人数が減った場合は余剰スロットを整理
        self.states.retain(|&slot, _| slot < results.len());

        output
    }
}

/// ウィンドウ内の最頻ラベルと出現数
/// 同数のときは先に現れたラベルを採用する
fn majority_of(history: &VecDeque<Action>) -> (Action, usize) {
    let mut top = Action::Unknown;
    let mut top_count = 0;
    for &candidate in history.iter() {
        let count = history.iter().filter(|&&a| a == candidate).count();
        if count > top_count {
            top = candidate;
            top_count = count;
        }
    }
    (top, top_count)
}
