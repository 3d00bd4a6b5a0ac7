// ログイン画面の切り替えとパスワード表示

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMode {
    #[default]
    Regular,
    Dashboard,
}

/// フォームの表示と見出し
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginView {
    pub regular_display: &'static str,
    pub dashboard_display: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl LoginMode {
    /// location.search（先頭の ? はあってもなくてもよい）から決める
    pub fn from_query(search: &str) -> Self {
        let dashboard = search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "dashboard" && value == "true");
        if dashboard { LoginMode::Dashboard } else { LoginMode::Regular }
    }

    pub fn view(&self) -> LoginView {
        match self {
            LoginMode::Regular => LoginView {
                regular_display: "block",
                dashboard_display: "none",
                title: "Welcome Back",
                subtitle: "Sign in to continue your learning journey",
            },
            LoginMode::Dashboard => LoginView {
                regular_display: "none",
                dashboard_display: "block",
                title: "Student Dashboard",
                subtitle: "Enter your student credentials",
            },
        }
    }
}

pub const EYE_CLASS: &str = "fa-eye";
pub const EYE_SLASH_CLASS: &str = "fa-eye-slash";

/// パスワード欄の表示切り替え
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordVisibility {
    visible: bool,
}

impl PasswordVisibility {
    /// 切り替え後に表示中かどうかを返す
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input_type(&self) -> &'static str {
        if self.visible { "text" } else { "password" }
    }

    /// (付けるクラス, 外すクラス)
    pub fn icon_classes(&self) -> (&'static str, &'static str) {
        if self.visible {
            (EYE_SLASH_CLASS, EYE_CLASS)
        } else {
            (EYE_CLASS, EYE_SLASH_CLASS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_query() {
        assert_eq!(LoginMode::from_query(""), LoginMode::Regular);
        assert_eq!(LoginMode::from_query("?dashboard=true"), LoginMode::Dashboard);
        assert_eq!(LoginMode::from_query("next=/home&dashboard=true"), LoginMode::Dashboard);
        assert_eq!(LoginMode::from_query("?dashboard=false"), LoginMode::Regular);
        assert_eq!(LoginMode::from_query("?dashboard"), LoginMode::Regular);
    }

    #[test]
    fn test_views() {
        let view = LoginMode::Dashboard.view();
        assert_eq!(view.regular_display, "none");
        assert_eq!(view.dashboard_display, "block");
        assert_eq!(view.title, "Student Dashboard");
        assert_eq!(LoginMode::Regular.view().title, "Welcome Back");
    }

    #[test]
    fn test_password_toggle() {
        let mut p = PasswordVisibility::default();
        assert_eq!(p.input_type(), "password");
        assert_eq!(p.icon_classes(), (EYE_CLASS, EYE_SLASH_CLASS));
        assert!(p.toggle());
        assert_eq!(p.input_type(), "text");
        assert_eq!(p.icon_classes(), (EYE_SLASH_CLASS, EYE_CLASS));
        assert!(!p.toggle());
        assert!(!p.is_visible());
    }
}
