// サイドバーとサブメニューの開閉

pub const SUBMENU_OPEN_CLASS: &str = "submenu-open";
pub const SUBMENU_PANEL_PREFIX: &str = "submenu-";

/// 操作の結果、DOM 側で必要になる追加処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarChange {
    Unchanged,
    SubmenuOpened,
    /// メインメニューに戻った（フォーカスを戻す）
    ReturnedToMain,
    /// サイドバー自体を閉じた
    Closed,
}

/// サイドバーの開閉（トグル用チェックボックスと同期）と開いているサブメニュー
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    open: bool,
    submenu: Option<String>,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active_submenu(&self) -> Option<&str> {
        self.submenu.as_deref()
    }

    pub fn is_submenu_open(&self) -> bool {
        self.submenu.is_some()
    }

    /// data-open-submenu ボタンの aria-expanded
    pub fn is_expanded(&self, id: &str) -> bool {
        self.submenu.as_deref() == Some(id)
    }

    /// submenu-<id> パネルの aria-hidden
    pub fn panel_hidden(&self, id: &str) -> bool {
        !self.is_expanded(id)
    }

    pub fn panel_id(id: &str) -> String {
        format!("{}{}", SUBMENU_PANEL_PREFIX, id)
    }

    pub fn open_submenu(&mut self, id: &str) -> SidebarChange {
        self.submenu = Some(id.to_string());
        SidebarChange::SubmenuOpened
    }

    pub fn back_to_main(&mut self) -> SidebarChange {
        self.submenu = None;
        SidebarChange::ReturnedToMain
    }

    /// Escape はサブメニューを先に閉じ、次にサイドバーを閉じる
    pub fn escape(&mut self) -> SidebarChange {
        if self.submenu.is_some() {
            self.back_to_main()
        } else if self.open {
            self.open = false;
            SidebarChange::Closed
        } else {
            SidebarChange::Unchanged
        }
    }

    /// トグルのチェックボックスが変わった時
    pub fn toggle_changed(&mut self, checked: bool) -> SidebarChange {
        self.open = checked;
        if checked {
            SidebarChange::Unchanged
        } else {
            self.back_to_main()
        }
    }

    /// ドキュメントのどこかがクリックされた時
    pub fn document_clicked(&mut self, inside_sidebar: bool, on_toggle: bool) -> SidebarChange {
        if on_toggle || inside_sidebar || !self.open {
            return SidebarChange::Unchanged;
        }
        self.open = false;
        self.submenu = None;
        SidebarChange::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submenu_open_and_back() {
        let mut s = Sidebar::new();
        s.toggle_changed(true);
        assert_eq!(s.open_submenu("courses"), SidebarChange::SubmenuOpened);
        assert!(s.is_expanded("courses"));
        assert!(!s.panel_hidden("courses"));
        assert!(s.panel_hidden("about"));
        assert_eq!(Sidebar::panel_id("courses"), "submenu-courses");

        s.open_submenu("about");
        assert!(!s.is_expanded("courses"));
        assert_eq!(s.back_to_main(), SidebarChange::ReturnedToMain);
        assert!(!s.is_submenu_open());
        assert!(s.is_open());
    }

    #[test]
    fn test_escape_closes_submenu_then_sidebar() {
        let mut s = Sidebar::new();
        s.toggle_changed(true);
        s.open_submenu("courses");
        assert_eq!(s.escape(), SidebarChange::ReturnedToMain);
        assert!(s.is_open());
        assert_eq!(s.escape(), SidebarChange::Closed);
        assert!(!s.is_open());
        assert_eq!(s.escape(), SidebarChange::Unchanged);
    }

    #[test]
    fn test_unchecking_toggle_resets_submenu() {
        let mut s = Sidebar::new();
        s.toggle_changed(true);
        s.open_submenu("courses");
        assert_eq!(s.toggle_changed(false), SidebarChange::ReturnedToMain);
        assert_eq!(s.active_submenu(), None);
    }

    #[test]
    fn test_outside_click_closes() {
        let mut s = Sidebar::new();
        assert_eq!(s.document_clicked(false, false), SidebarChange::Unchanged);
        s.toggle_changed(true);
        s.open_submenu("courses");
        assert_eq!(s.document_clicked(true, false), SidebarChange::Unchanged);
        assert_eq!(s.document_clicked(false, true), SidebarChange::Unchanged);
        assert_eq!(s.document_clicked(false, false), SidebarChange::Closed);
        assert!(!s.is_open());
        assert!(!s.is_submenu_open());
    }
}
