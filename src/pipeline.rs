use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::classify::{ActionDetector, ActionResult, BaselineCalibrator};
use crate::config::{Config, CounterConfig};
use crate::pose::Pose;
use crate::tracker::{ActionStabilizer, Announcer, PoseSmoother, RepCounter, RepCounts};

/// 1スロット分のティック出力
#[derive(Debug, Clone)]
pub struct SubjectOutput {
    /// 分類器の生結果
    pub raw: ActionResult,
    /// 安定化後の結果（オーバーレイ・読み上げ・カウントはこちらを使う）
    pub stable: ActionResult,
    /// 描画用の平滑化済み骨格
    pub smoothed: Pose,
    pub counts: RepCounts,
}

/// 1ティック分のパイプライン出力
#[derive(Debug, Clone)]
pub struct TickResult {
    pub subjects: Vec<SubjectOutput>,
    /// 読み上げ文（スロット0のみ対象）
    pub announcement: Option<String>,
}

impl TickResult {
    fn empty() -> Self {
        Self {
            subjects: Vec::new(),
            announcement: None,
        }
    }
}

/// フレーム→分類→安定化→カウントの1ティック処理
///
/// スロットごとの状態（基準値・安定化履歴・カウンタ・平滑化キャッシュ）を
/// すべてここが所有する。ティックは同期で完走し、同一スロットの状態を
/// 並行に触る書き手はいない（スロット単位のシングルライタ）
pub struct Pipeline {
    detector: ActionDetector,
    stabilizer: ActionStabilizer,
    smoother: PoseSmoother,
    announcer: Announcer,
    calibrators: HashMap<usize, BaselineCalibrator>,
    counters: HashMap<usize, RepCounter>,
    counter_config: CounterConfig,
    visual_hold: Duration,
    last_subjects: Vec<SubjectOutput>,
    last_nonempty_at: Option<Instant>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            detector: ActionDetector::from_config(&config.classify),
            stabilizer: ActionStabilizer::from_config(&config.stabilize),
            smoother: PoseSmoother::from_config(&config.smooth),
            announcer: Announcer::from_config(&config.announce),
            calibrators: HashMap::new(),
            counters: HashMap::new(),
            counter_config: config.counter.clone(),
            visual_hold: Duration::from_millis(config.ui.visual_hold_ms),
            last_subjects: Vec::new(),
            last_nonempty_at: None,
        }
    }

    /// 1ティック分のフレーム群を処理する
    ///
    /// now はティック開始時に一度だけ取得した単調時刻。すべての
    /// タイムアウト判定（安定化保持・表示保持・クールダウン）は
    /// この値に対する比較で行う
    pub fn process(&mut self, poses: &[Pose], now: Instant) -> TickResult {
        // 基準更新と分類
        let mut raws = Vec::with_capacity(poses.len());
        for (slot, pose) in poses.iter().enumerate() {
            let calibrator = self.calibrators.entry(slot).or_default();
            calibrator.observe(pose);
            let reference = calibrator.reference(pose);
            raws.push(self.detector.detect(pose, &reference));
        }

        // 安定化（空入力でも呼ぶ: スロット整理のため）
        let stables = self.stabilizer.update(&raws, now);

        // 安定化済みラベルで回数更新
        let counter_config = self.counter_config.clone();
        for (slot, stable) in stables.iter().enumerate() {
            self.counters
                .entry(slot)
                .or_insert_with(|| RepCounter::from_config(&counter_config))
                .update(stable.action, now);
        }

        // 人数が減った場合は余剰スロットの状態を破棄
        // （同じスロット番号に別人が入ったとき基準値が漏れないように）
        self.calibrators.retain(|&slot, _| slot < poses.len());
        self.counters.retain(|&slot, _| slot < poses.len());

        if poses.is_empty() {
            // 短時間の検出落ちは直前の出力を保持し、超過したら忘れる
            if let Some(at) = self.last_nonempty_at {
                if now.duration_since(at) <= self.visual_hold {
                    return TickResult {
                        subjects: self.last_subjects.clone(),
                        announcement: None,
                    };
                }
            }
            self.smoother.reset();
            self.last_subjects.clear();
            self.last_nonempty_at = None;
            return TickResult::empty();
        }

        let smoothed = self.smoother.smooth(poses);
        let announcement = self.announcer.update(&stables[0], now);

        let subjects: Vec<SubjectOutput> = raws
            .into_iter()
            .zip(stables.into_iter())
            .zip(smoothed.into_iter())
            .enumerate()
            .map(|(slot, ((raw, stable), smoothed))| SubjectOutput {
                raw,
                stable,
                smoothed,
                counts: self.counters[&slot].counts(),
            })
            .collect();

        self.last_subjects = subjects.clone();
        self.last_nonempty_at = Some(now);

        TickResult {
            subjects,
            announcement,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// オーバーレイ再描画の上限レートゲート
pub struct RefreshLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshLimiter {
    pub fn new(max_fps: u32) -> Self {
        Self {
            interval: Duration::from_millis(1000 / u64::from(max_fps.max(1))),
            last: None,
        }
    }

    /// このティックで再描画してよいか
    pub fn should_refresh(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}
