use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
    #[serde(default)]
    pub stabilize: StabilizeConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub announce: AnnounceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub osc: OscConfig,
}

/// 分類器の入力ゲート閾値
#[derive(Debug, Deserialize, Clone)]
pub struct ClassifyConfig {
    /// キーポイントを「有効」とみなす信頼度フロア
    #[serde(default = "default_valid_confidence")]
    pub valid_confidence: f32,
    /// 判定に必要な有効キーポイント数
    #[serde(default = "default_min_valid_keypoints")]
    pub min_valid_keypoints: usize,
    /// 足首の信頼度フロア（下肢ゲート）
    #[serde(default = "default_ankle_confidence")]
    pub ankle_confidence: f32,
    /// 膝の信頼度フロア（下肢ゲート）
    #[serde(default = "default_knee_confidence")]
    pub knee_confidence: f32,
}

fn default_valid_confidence() -> f32 { 0.3 }
fn default_min_valid_keypoints() -> usize { 12 }
fn default_ankle_confidence() -> f32 { 0.35 }
fn default_knee_confidence() -> f32 { 0.25 }

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            valid_confidence: default_valid_confidence(),
            min_valid_keypoints: default_min_valid_keypoints(),
            ankle_confidence: default_ankle_confidence(),
            knee_confidence: default_knee_confidence(),
        }
    }
}

/// 描画用キーポイント平滑化
#[derive(Debug, Deserialize, Clone)]
pub struct SmoothConfig {
    /// EMA係数（大きいほど追従が速く、滑らかさは減る）
    #[serde(default = "default_smooth_alpha")]
    pub alpha: f32,
    /// これ未満の信頼度のサンプルは平均に取り込まず前回位置を凍結
    #[serde(default = "default_smooth_min_confidence")]
    pub min_confidence: f32,
}

fn default_smooth_alpha() -> f32 { 0.3 }
fn default_smooth_min_confidence() -> f32 { 0.2 }

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            alpha: default_smooth_alpha(),
            min_confidence: default_smooth_min_confidence(),
        }
    }
}

/// ラベル安定化（多数決ウィンドウ）
#[derive(Debug, Deserialize, Clone)]
pub struct StabilizeConfig {
    /// 多数決ウィンドウのフレーム数
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// 安定とみなす最小一致数
    #[serde(default = "default_min_agree")]
    pub min_agree: usize,
    /// 多数決が崩れた後も直前の安定結果を出し続ける時間 (ms)
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

fn default_window_size() -> usize { 4 }
fn default_min_agree() -> usize { 3 }
fn default_hold_ms() -> u64 { 400 }

impl Default for StabilizeConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            min_agree: default_min_agree(),
            hold_ms: default_hold_ms(),
        }
    }
}

/// 回数カウンタ
#[derive(Debug, Deserialize, Clone)]
pub struct CounterConfig {
    /// 同一種目の連続カウント間の下限時間 (ms)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 { 450 }

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

/// 読み上げデバウンス
#[derive(Debug, Deserialize, Clone)]
pub struct AnnounceConfig {
    /// 同一動作を繰り返し読み上げる最小間隔 (ms)
    #[serde(default = "default_announce_interval_ms")]
    pub interval_ms: u64,
    /// 読み上げ前の確認に使う履歴フレーム数
    #[serde(default = "default_announce_history_size")]
    pub history_size: usize,
    /// 読み上げに必要な履歴内一致数
    #[serde(default = "default_announce_min_agree")]
    pub min_agree: usize,
}

fn default_announce_interval_ms() -> u64 { 2000 }
fn default_announce_history_size() -> usize { 5 }
fn default_announce_min_agree() -> usize { 4 }

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_announce_interval_ms(),
            history_size: default_announce_history_size(),
            min_agree: default_announce_min_agree(),
        }
    }
}

/// 表示まわり
#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// オーバーレイ再描画の上限 (fps)
    #[serde(default = "default_max_fps")]
    pub max_fps: u32,
    /// 検出が空になってから直前の結果を表示し続ける時間 (ms)
    #[serde(default = "default_visual_hold_ms")]
    pub visual_hold_ms: u64,
}

fn default_max_fps() -> u32 { 60 }
fn default_visual_hold_ms() -> u64 { 320 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_fps: default_max_fps(),
            visual_hold_ms: default_visual_hold_ms(),
        }
    }
}

/// 判定結果のOSC送信
#[derive(Debug, Deserialize, Clone)]
pub struct OscConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 送信先アドレス
    #[serde(default = "default_osc_addr")]
    pub addr: String,
}

fn default_osc_addr() -> String {
    crate::osc::COACH_DEFAULT_ADDR.to_string()
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_osc_addr(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読めなければ既定値で続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "設定ファイルを読めないため既定値を使用します"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_parameters() {
        let config = Config::default();
        assert_eq!(config.classify.min_valid_keypoints, 12);
        assert!((config.classify.valid_confidence - 0.3).abs() < 1e-6);
        assert!((config.classify.ankle_confidence - 0.35).abs() < 1e-6);
        assert!((config.classify.knee_confidence - 0.25).abs() < 1e-6);
        assert!((config.smooth.alpha - 0.3).abs() < 1e-6);
        assert_eq!(config.stabilize.window_size, 4);
        assert_eq!(config.stabilize.min_agree, 3);
        assert_eq!(config.stabilize.hold_ms, 400);
        assert_eq!(config.counter.cooldown_ms, 450);
        assert_eq!(config.ui.visual_hold_ms, 320);
        assert!(!config.osc.enabled);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.stabilize.window_size, 4);
        assert_eq!(config.counter.cooldown_ms, 450);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [stabilize]
            window_size = 3

            [counter]
            cooldown_ms = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.stabilize.window_size, 3);
        // 同セクションの他フィールドは既定値のまま
        assert_eq!(config.stabilize.min_agree, 3);
        assert_eq!(config.counter.cooldown_ms, 400);
    }
}
