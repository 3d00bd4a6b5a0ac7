// テスティモニアル本文の「Read More」展開と、折りたたみ時の高さ揃え

use crate::engine::scheduler::TimerHandle;

pub const LABEL_COLLAPSED: &str = "Read More";
pub const LABEL_EXPANDED: &str = "Read Less";

/// カードコンテナに設定する min-height
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinHeight {
    /// スタイルを外す
    Unset,
    Px(f32),
    Auto,
}

impl MinHeight {
    pub fn css_value(&self) -> String {
        match self {
            MinHeight::Unset => String::new(),
            MinHeight::Px(px) => format!("{}px", px),
            MinHeight::Auto => "auto".to_string(),
        }
    }
}

/// カードごとの展開状態
#[derive(Debug, Clone, Default)]
pub struct ReadMore {
    expanded: Vec<bool>,
}

impl ReadMore {
    pub fn new(card_count: usize) -> Self {
        Self {
            expanded: vec![false; card_count],
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    pub fn expanded_flags(&self) -> &[bool] {
        &self.expanded
    }

    /// 切り替え後の状態を返す
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.expanded.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                *flag
            }
            None => false,
        }
    }

    pub fn label(&self, index: usize) -> &'static str {
        if self.is_expanded(index) { LABEL_EXPANDED } else { LABEL_COLLAPSED }
    }

    /// 展開中はフェードを隠す
    pub fn fade_hidden(&self, index: usize) -> bool {
        self.is_expanded(index)
    }
}

/// 折りたたみ時の共通 min-height を保持する
#[derive(Debug, Clone, Default)]
pub struct HeightEqualizer {
    shared_min_height: f32,
}

impl HeightEqualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared_min_height(&self) -> f32 {
        self.shared_min_height
    }

    /// collapsed_heights は各カードを折りたたんだ状態で測った高さ
    pub fn equalize(&mut self, collapsed_heights: &[f32], expanded: &[bool]) -> Vec<MinHeight> {
        self.shared_min_height = collapsed_heights.iter().copied().fold(0.0, f32::max);
        collapsed_heights
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if expanded.get(i).copied().unwrap_or(false) {
                    MinHeight::Unset
                } else {
                    MinHeight::Px(self.shared_min_height)
                }
            })
            .collect()
    }

    /// 展開したカードは伸びられるようにし、閉じたら共通値に戻す
    pub fn after_toggle(&self, expanded: bool) -> MinHeight {
        if expanded {
            MinHeight::Auto
        } else {
            MinHeight::Px(self.shared_min_height)
        }
    }
}

/// リサイズ後の揃え直しを待つタイマー（常に高々1本）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeDebounce {
    pending: Option<TimerHandle>,
}

impl ResizeDebounce {
    /// 新しいタイマーを登録し、取り消すべき古いタイマーを返す
    pub fn schedule(&mut self, handle: TimerHandle) -> Option<TimerHandle> {
        self.pending.replace(handle)
    }

    /// タイマーが発火した
    pub fn fired(&mut self) {
        self.pending = None;
    }

    /// 破棄時に取り消すタイマー
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_more_labels() {
        let mut rm = ReadMore::new(3);
        assert_eq!(rm.label(1), LABEL_COLLAPSED);
        assert!(rm.toggle(1));
        assert_eq!(rm.label(1), LABEL_EXPANDED);
        assert!(rm.fade_hidden(1));
        assert!(!rm.toggle(1));
        assert!(!rm.toggle(10));
    }

    #[test]
    fn test_equalize_skips_expanded_cards() {
        let mut eq = HeightEqualizer::new();
        let heights = eq.equalize(&[220.0, 260.0, 240.0], &[false, true, false]);
        assert_eq!(eq.shared_min_height(), 260.0);
        assert_eq!(heights, vec![MinHeight::Px(260.0), MinHeight::Unset, MinHeight::Px(260.0)]);
        assert_eq!(eq.after_toggle(true), MinHeight::Auto);
        assert_eq!(eq.after_toggle(false).css_value(), "260px");
    }

    #[test]
    fn test_equalize_empty() {
        let mut eq = HeightEqualizer::new();
        assert!(eq.equalize(&[], &[]).is_empty());
        assert_eq!(eq.shared_min_height(), 0.0);
    }

    #[test]
    fn test_debounce_keeps_one_timer_and_cancels_on_destroy() {
        let mut d = ResizeDebounce::default();
        assert_eq!(d.schedule(TimerHandle(1)), None);
        assert_eq!(d.schedule(TimerHandle(2)), Some(TimerHandle(1)));
        assert_eq!(d.cancel(), Some(TimerHandle(2)));
        assert_eq!(d.cancel(), None);

        d.schedule(TimerHandle(3));
        d.fired();
        assert!(!d.is_pending());
        assert_eq!(d.cancel(), None);
    }
}
