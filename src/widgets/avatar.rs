// アバター画像のアップロードプレビュー

/// 1つのアップロード入力に対応するプレビュー状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarPreview {
    image_src: Option<String>,
    /// 読み込み中のファイルの通し番号
    pending: Option<u32>,
    next_read: u32,
}

impl AvatarPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルが選ばれた。読み込みを始めるなら読み込み番号を返す
    ///
    /// 選択が取り消された（ファイル無し）場合は何もしない。
    pub fn file_selected(&mut self, has_file: bool) -> Option<u32> {
        if !has_file {
            return None;
        }
        self.next_read += 1;
        self.pending = Some(self.next_read);
        self.pending
    }

    /// 読み込み完了。古い読み込みの結果は捨てる
    pub fn loaded(&mut self, read: u32, data_url: String) -> bool {
        if self.pending != Some(read) {
            return false;
        }
        self.pending = None;
        self.image_src = Some(data_url);
        true
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn image_src(&self) -> Option<&str> {
        self.image_src.as_deref()
    }

    pub fn image_hidden(&self) -> bool {
        self.image_src.is_none()
    }

    pub fn default_icon_hidden(&self) -> bool {
        self.image_src.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_replaces_default_icon() {
        let mut a = AvatarPreview::new();
        assert!(a.image_hidden());
        assert!(!a.default_icon_hidden());

        let read = a.file_selected(true).unwrap();
        assert!(a.is_loading());
        assert!(a.loaded(read, "data:image/png;base64,AAAA".to_string()));
        assert_eq!(a.image_src(), Some("data:image/png;base64,AAAA"));
        assert!(!a.image_hidden());
        assert!(a.default_icon_hidden());
    }

    #[test]
    fn test_cancelled_selection_keeps_previous_image() {
        let mut a = AvatarPreview::new();
        let read = a.file_selected(true).unwrap();
        a.loaded(read, "data:a".to_string());
        assert_eq!(a.file_selected(false), None);
        assert_eq!(a.image_src(), Some("data:a"));
    }

    #[test]
    fn test_stale_read_is_ignored() {
        let mut a = AvatarPreview::new();
        let first = a.file_selected(true).unwrap();
        let second = a.file_selected(true).unwrap();
        assert!(!a.loaded(first, "data:old".to_string()));
        assert!(a.loaded(second, "data:new".to_string()));
        assert_eq!(a.image_src(), Some("data:new"));
    }
}
