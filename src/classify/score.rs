/// 区間ソフトスコア (0.0〜1.0)
///
/// invert=false: [low, high] 内で1.0、区間外は幅 soft の遷移帯で線形に0へ
/// invert=true: 小さいほど良い。low 以下で1.0、high までは (high-low) で
/// 線形降下、high+soft 以上で0
pub fn score_range(value: f32, low: f32, high: f32, soft: f32, invert: bool) -> f32 {
    if !invert {
        if value < low - soft || value > high + soft {
            0.0
        } else if value >= low && value <= high {
            1.0
        } else if value < low {
            1.0 - ((low - value) / soft).clamp(0.0, 1.0)
        } else {
            1.0 - ((value - high) / soft).clamp(0.0, 1.0)
        }
    } else if value <= low {
        1.0
    } else if value >= high + soft {
        0.0
    } else if value <= high {
        1.0 - ((value - low) / (high - low)).clamp(0.0, 1.0)
    } else {
        1.0 - ((value - high) / soft).clamp(0.0, 1.0)
    }
}

/// 手を頭上に挙げている度合い (0.0〜1.0)
///
/// 「手首が肩より ref_height の5%以上高い」(重み0.6) と
/// 「手首が鼻と同じかそれより高い」(重み0.4) のブレンド
pub fn score_over_head(wrist_y: f32, shoulder_y: f32, nose_y: f32, ref_height: f32) -> f32 {
    let shoulder_gap = shoulder_y - wrist_y;
    let head_gap = nose_y - wrist_y;
    let need = ref_height * 0.05;

    let shoulder_score = ((shoulder_gap - need) / (ref_height * 0.05)).clamp(0.0, 1.0);
    let head_score = (head_gap / (ref_height * 0.05)).clamp(0.0, 1.0);

    (shoulder_score * 0.6 + head_score * 0.4).clamp(0.0, 1.0)
}
