use crate::pose::Keypoint;

/// 角度・距離計算の信頼度フロア
/// これ未満のキーポイントを含む計算は「不明」として0を返す
pub const GEOMETRY_CONFIDENCE_FLOOR: f32 = 0.2;

/// 3点 a-center-b のなす角（度、0〜180）
///
/// acos ではなく atan2(cross, dot) で計算する。0度/180度付近の
/// 共線に近い点でも数値的に安定
/// いずれかの点の信頼度がフロア未満なら0（エラーではなく「角度不明」）
pub fn angle_degrees(a: &Keypoint, center: &Keypoint, b: &Keypoint) -> f32 {
    if a.confidence < GEOMETRY_CONFIDENCE_FLOOR
        || center.confidence < GEOMETRY_CONFIDENCE_FLOOR
        || b.confidence < GEOMETRY_CONFIDENCE_FLOOR
    {
        return 0.0;
    }

    let v1x = a.x - center.x;
    let v1y = a.y - center.y;
    let v2x = b.x - center.x;
    let v2y = b.y - center.y;

    let dot = v1x * v2x + v1y * v2y;
    let cross = v1x * v2y - v1y * v2x;

    cross.atan2(dot).to_degrees().abs()
}

/// 2点間のユークリッド距離（px）
/// 信頼度ゲートは angle_degrees と同じ
pub fn distance(a: &Keypoint, b: &Keypoint) -> f32 {
    if a.confidence < GEOMETRY_CONFIDENCE_FLOOR || b.confidence < GEOMETRY_CONFIDENCE_FLOOR {
        return 0.0;
    }
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
