/// 判定対象の標準動作
///
/// Unknown は正常な出力値のひとつ（判定不能）であり、エラーではない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Standing,
    Squatting,
    JumpingJack,
    HorseStance,
    ArmsExtended,
    ArmsRaised,
    HandsOnHips,
    ArmsCrossed,
    Unknown,
}

impl Action {
    /// OSC送信などで使う安定した識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standing => "standing",
            Self::Squatting => "squatting",
            Self::JumpingJack => "jumping_jack",
            Self::HorseStance => "horse_stance",
            Self::ArmsExtended => "arms_extended",
            Self::ArmsRaised => "arms_raised",
            Self::HandsOnHips => "hands_on_hips",
            Self::ArmsCrossed => "arms_crossed",
            Self::Unknown => "unknown",
        }
    }

    /// 画面表示・読み上げ用の名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Standing => "立位",
            Self::Squatting => "スクワット",
            Self::JumpingJack => "ジャンピングジャック",
            Self::HorseStance => "騎馬立ち",
            Self::ArmsExtended => "両腕水平挙上",
            Self::ArmsRaised => "両腕挙上",
            Self::HandsOnHips => "腰に手",
            Self::ArmsCrossed => "腕組み",
            Self::Unknown => "不明",
        }
    }
}

/// 1フレーム分の動作判定結果
///
/// ティックごとに新規生成される。corrections は修正アドバイス文
/// （姿勢が完全なら空）
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub action: Action,
    pub confidence: f32,
    pub corrections: Vec<String>,
}

impl ActionResult {
    pub fn new(action: Action, confidence: f32) -> Self {
        Self {
            action,
            confidence,
            corrections: Vec::new(),
        }
    }

    pub fn with_corrections(action: Action, confidence: f32, corrections: Vec<String>) -> Self {
        Self {
            action,
            confidence,
            corrections,
        }
    }

    /// 判定不能（アドバイスなし）
    pub fn unknown() -> Self {
        Self::new(Action::Unknown, 0.0)
    }

    /// 判定不能（理由のアドバイス付き）
    pub fn unknown_with(hint: impl Into<String>) -> Self {
        Self::with_corrections(Action::Unknown, 0.0, vec![hint.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_has_zero_confidence() {
        let result = ActionResult::unknown();
        assert_eq!(result.action, Action::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_unknown_with_hint() {
        let result = ActionResult::unknown_with("テスト");
        assert_eq!(result.corrections.len(), 1);
    }

    #[test]
    fn test_as_str_is_stable() {
        assert_eq!(Action::JumpingJack.as_str(), "jumping_jack");
        assert_eq!(Action::HorseStance.as_str(), "horse_stance");
    }
}
