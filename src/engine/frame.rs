use serde::Serialize;

/// トランジションの指定
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// 確定位置へアニメーションで移動
    Animated { duration_ms: u32, easing: String },
    /// ドラッグ中は即時反映
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorState {
    pub count: usize,
    pub active: usize,
}

/// エンジンの描画結果。アダプタはこれをそのまま画面に反映する
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackFrame {
    pub translate_x: f32,
    /// active クラスを付けるカード（1ページに複数枚見えていても1枚だけ）
    pub active_card: usize,
    pub indicators: IndicatorState,
    /// 前へ / 次へボタンを表示するか
    pub controls_visible: bool,
    pub transition: Transition,
}
