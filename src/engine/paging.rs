// ページング計算
// インデックスは常に [0, max_index] に収まる

/// 最後に有効な先頭インデックス
pub fn max_index(card_count: usize, cards_per_view: usize) -> usize {
    card_count.saturating_sub(cards_per_view)
}

/// 範囲外は折り返さずに端へ寄せる
pub fn clamp_index(index: isize, card_count: usize, cards_per_view: usize) -> usize {
    let max = max_index(card_count, cards_per_view);
    if index < 0 {
        0
    } else {
        (index as usize).min(max)
    }
}

/// 次へ（最後からは0へ戻る）
pub fn next_index(current: usize, card_count: usize, cards_per_view: usize) -> usize {
    if current < max_index(card_count, cards_per_view) {
        current + 1
    } else {
        0
    }
}

/// 前へ（0からは最後へ回る）
pub fn previous_index(current: usize, card_count: usize, cards_per_view: usize) -> usize {
    if current > 0 {
        current - 1
    } else {
        max_index(card_count, cards_per_view)
    }
}

pub fn indicator_count(card_count: usize, cards_per_view: usize) -> usize {
    max_index(card_count, cards_per_view) + 1
}

/// 1ページに収まりきらないか
pub fn has_overflow(card_count: usize, cards_per_view: usize) -> bool {
    card_count > cards_per_view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_index() {
        assert_eq!(max_index(10, 4), 6);
        assert_eq!(max_index(3, 4), 0);
        assert_eq!(max_index(0, 1), 0);
    }

    #[test]
    fn test_clamp_never_wraps() {
        assert_eq!(clamp_index(-3, 10, 4), 0);
        assert_eq!(clamp_index(99, 10, 4), 6);
        assert_eq!(clamp_index(4, 10, 4), 4);
    }

    #[test]
    fn test_circular_navigation() {
        assert_eq!(next_index(6, 10, 4), 0);
        assert_eq!(previous_index(0, 10, 4), 6);
        assert_eq!(next_index(0, 2, 4), 0);
        assert_eq!(previous_index(0, 2, 4), 0);
    }

    #[test]
    fn test_index_stays_in_bounds_for_all_layouts() {
        for card_count in 0..12 {
            for per_view in 1..=4 {
                let max = max_index(card_count, per_view);
                let mut idx = 0;
                for _ in 0..30 {
                    idx = next_index(idx, card_count, per_view);
                    assert!(idx <= max);
                }
                for _ in 0..30 {
                    idx = previous_index(idx, card_count, per_view);
                    assert!(idx <= max);
                }
            }
        }
    }

    #[test]
    fn test_indicator_count_is_at_least_one() {
        assert_eq!(indicator_count(0, 4), 1);
        assert_eq!(indicator_count(3, 4), 1);
        assert_eq!(indicator_count(10, 4), 7);
        assert_eq!(indicator_count(5, 1), 5);
    }
}
