// トラックの寸法と translate 計算

use super::paging;
use serde::{Deserialize, Serialize};

/// ホストから読み取ったレイアウト寸法（px）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// 先頭カードの幅
    pub card_width: f32,
    /// カード間の column-gap
    pub gap: f32,
    /// 表示コンテナの幅
    pub container_width: f32,
}

/// 1枚表示レイアウトでの translate の範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateBounds {
    pub min: f32,
    pub max: f32,
}

impl TranslateBounds {
    pub fn clamp(&self, value: f32) -> f32 {
        if value > self.max {
            self.max
        } else if value < self.min {
            self.min
        } else {
            value
        }
    }
}

impl TrackGeometry {
    pub fn new(card_width: f32, gap: f32, container_width: f32) -> Self {
        Self {
            card_width,
            gap,
            container_width,
        }
    }

    /// カード1枚分の送り量（幅 + gap）
    pub fn card_full_width(&self) -> f32 {
        self.card_width + self.gap
    }

    /// 中央寄せのためのオフセット
    pub fn center_offset(&self) -> f32 {
        (self.container_width - self.card_width) / 2.0
    }

    pub fn translate_bounds(&self, card_count: usize) -> TranslateBounds {
        let center = self.center_offset();
        let last = card_count.saturating_sub(1) as f32;
        TranslateBounds {
            min: -(last * self.card_full_width()) + center,
            max: center,
        }
    }

    /// index を表示するための translate を求める
    ///
    /// 全カードが1ページに収まる場合は 0。
    /// 1枚表示ではカードを中央に寄せたうえで範囲内に収める。
    pub fn translate_for_index(&self, index: usize, card_count: usize, cards_per_view: usize) -> f32 {
        if !paging::has_overflow(card_count, cards_per_view) {
            return 0.0;
        }
        let offset = -(index as f32) * self.card_full_width();
        if cards_per_view == 1 {
            return self
                .translate_bounds(card_count)
                .clamp(offset + self.center_offset());
        }
        offset
    }

    /// ドラッグでページ送りを確定させる距離
    pub fn commit_threshold(&self, max_px: f32, ratio: f32) -> f32 {
        max_px.min(self.card_full_width() * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobile() -> TrackGeometry {
        TrackGeometry::new(300.0, 16.0, 364.0)
    }

    #[test]
    fn test_single_card_is_centered() {
        let g = mobile();
        assert_eq!(g.center_offset(), 32.0);
        assert_eq!(g.translate_for_index(0, 5, 1), 32.0);
        assert_eq!(g.translate_for_index(2, 5, 1), -600.0);
    }

    #[test]
    fn test_single_card_is_clamped_to_bounds() {
        let g = mobile();
        let bounds = g.translate_bounds(3);
        assert_eq!(bounds.max, 32.0);
        assert_eq!(bounds.min, -600.0);
        // 範囲外の index でも最小値に留まる
        assert_eq!(g.translate_for_index(7, 3, 1), -600.0);
    }

    #[test]
    fn test_multi_card_offset() {
        let g = TrackGeometry::new(280.0, 24.0, 1200.0);
        assert_eq!(g.translate_for_index(0, 10, 4), 0.0);
        assert_eq!(g.translate_for_index(3, 10, 4), -912.0);
    }

    #[test]
    fn test_no_overflow_is_zero() {
        let g = mobile();
        assert_eq!(g.translate_for_index(0, 1, 1), 0.0);
        assert_eq!(g.translate_for_index(0, 3, 4), 0.0);
    }

    #[test]
    fn test_commit_threshold() {
        assert_eq!(mobile().commit_threshold(50.0, 0.15), 316.0 * 0.15);
        assert_eq!(TrackGeometry::new(400.0, 0.0, 800.0).commit_threshold(50.0, 0.15), 50.0);
    }
}
