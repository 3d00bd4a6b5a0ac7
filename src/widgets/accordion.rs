// FAQ のアコーディオン（同時に開けるのは1項目だけ）

pub const ICON_CLOSED: &str = "+";
pub const ICON_OPEN: &str = "−";

#[derive(Debug, Clone, Default)]
pub struct Accordion {
    item_count: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            open: None,
        }
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// 閉じている項目なら他を閉じて開く。開いている項目なら閉じる
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index >= self.item_count {
            return self.open;
        }
        self.open = if self.is_open(index) { None } else { Some(index) };
        self.open
    }

    pub fn icon(&self, index: usize) -> &'static str {
        if self.is_open(index) { ICON_OPEN } else { ICON_CLOSED }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_open_item() {
        let mut acc = Accordion::new(4);
        assert_eq!(acc.toggle(1), Some(1));
        assert_eq!(acc.toggle(3), Some(3));
        assert!(!acc.is_open(1));
        assert_eq!(acc.icon(3), ICON_OPEN);
        assert_eq!(acc.icon(1), ICON_CLOSED);
        assert_eq!(acc.toggle(3), None);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut acc = Accordion::new(2);
        acc.toggle(0);
        assert_eq!(acc.toggle(9), Some(0));
    }
}
