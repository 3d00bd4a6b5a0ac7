// サイト全体の設定
// 値はすべて元のページスクリプトのハードコード値をデフォルトにしている

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ビューポート幅の境界（px）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: f32,
    pub tablet: f32,
    pub desktop: f32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768.0,
            tablet: 1024.0,
            desktop: 1280.0,
        }
    }
}

/// 幅の段階ごとの表示カード数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCounts {
    pub mobile: usize,
    pub tablet: usize,
    pub desktop: usize,
    pub wide: usize,
}

impl Default for TierCounts {
    fn default() -> Self {
        Self {
            mobile: 1,
            tablet: 2,
            desktop: 3,
            wide: 4,
        }
    }
}

/// カルーセルエンジンの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub breakpoints: Breakpoints,
    pub cards_per_view: TierCounts,
    pub auto_advance_interval_ms: u32,
    /// これ以下の移動はドラッグとして扱わない
    pub drag_dead_zone_px: f32,
    /// 確定しきい値 = min(drag_commit_max_px, drag_commit_ratio × カード幅)
    pub drag_commit_max_px: f32,
    pub drag_commit_ratio: f32,
    pub transition_duration_ms: u32,
    pub transition_easing: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            cards_per_view: TierCounts::default(),
            auto_advance_interval_ms: 4000,
            drag_dead_zone_px: 10.0,
            drag_commit_max_px: 50.0,
            drag_commit_ratio: 0.15,
            transition_duration_ms: 400,
            transition_easing: "cubic-bezier(0.25,0.46,0.45,0.94)".to_string(),
        }
    }
}

impl CarouselConfig {
    /// ビューポート幅から1ページあたりのカード数を決める
    pub fn cards_per_view_for(&self, viewport_width: f32) -> usize {
        let bp = &self.breakpoints;
        let tiers = &self.cards_per_view;
        if viewport_width < bp.mobile {
            tiers.mobile
        } else if viewport_width < bp.tablet {
            tiers.tablet
        } else if viewport_width < bp.desktop {
            tiers.desktop
        } else {
            tiers.wide
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bp = &self.breakpoints;
        if !(bp.mobile < bp.tablet && bp.tablet < bp.desktop) {
            return Err(ConfigError::invalid(format!(
                "breakpoints must be strictly ascending (got {} / {} / {})",
                bp.mobile, bp.tablet, bp.desktop
            )));
        }
        let t = &self.cards_per_view;
        if [t.mobile, t.tablet, t.desktop, t.wide].contains(&0) {
            return Err(ConfigError::invalid("cards_per_view tiers must be at least 1"));
        }
        if self.auto_advance_interval_ms == 0 {
            return Err(ConfigError::invalid("auto_advance_interval_ms must be positive"));
        }
        if self.drag_dead_zone_px < 0.0 {
            return Err(ConfigError::invalid("drag_dead_zone_px must not be negative"));
        }
        if !(self.drag_commit_ratio > 0.0 && self.drag_commit_ratio <= 1.0) {
            return Err(ConfigError::invalid("drag_commit_ratio must be in (0, 1]"));
        }
        Ok(())
    }
}

/// テスティモニアル用ページャの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// この幅以上で wide_slides 枚表示
    pub wide_min_width: f32,
    pub narrow_slides: usize,
    pub wide_slides: usize,
    pub auto_advance_interval_ms: u32,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            wide_min_width: 1024.0,
            narrow_slides: 1,
            wide_slides: 3,
            auto_advance_interval_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// リサイズ後に高さを揃え直すまでの待ち時間
    pub resize_debounce_ms: u32,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 150,
        }
    }
}

/// 紹介動画の埋め込み設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// 空文字なら埋め込まない
    pub youtube_id: String,
    /// この幅未満はモバイル用のコンテナに埋め込む
    pub mobile_max_width: f32,
    /// コンテナがこの割合だけ見えたら iframe を表示する
    pub visible_threshold: f32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            youtube_id: "vzq_23qN6U8".to_string(),
            mobile_max_width: 768.0,
            visible_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// .alert を自動で消すまでの時間
    pub alert_dismiss_ms: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            alert_dismiss_ms: 5000,
        }
    }
}

/// ページ全体の設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub carousel: CarouselConfig,
    pub pager: PagerConfig,
    pub expander: ExpanderConfig,
    pub video: VideoConfig,
    pub login: LoginConfig,
}

impl SiteConfig {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.carousel.validate()?;
        if self.pager.narrow_slides == 0 || self.pager.wide_slides == 0 {
            return Err(ConfigError::invalid("pager slide counts must be at least 1"));
        }
        if self.pager.auto_advance_interval_ms == 0 {
            return Err(ConfigError::invalid("pager interval must be positive"));
        }
        if !(0.0..=1.0).contains(&self.video.visible_threshold) {
            return Err(ConfigError::invalid("video.visible_threshold must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_per_view_tiers() {
        let config = CarouselConfig::default();
        assert_eq!(config.cards_per_view_for(375.0), 1);
        assert_eq!(config.cards_per_view_for(767.9), 1);
        assert_eq!(config.cards_per_view_for(768.0), 2);
        assert_eq!(config.cards_per_view_for(1023.0), 2);
        assert_eq!(config.cards_per_view_for(1024.0), 3);
        assert_eq!(config.cards_per_view_for(1279.0), 3);
        assert_eq!(config.cards_per_view_for(1280.0), 4);
        assert_eq!(config.cards_per_view_for(2560.0), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SiteConfig::from_json_str(r#"{"carousel": {"auto_advance_interval_ms": 2500}}"#)
            .unwrap();
        assert_eq!(config.carousel.auto_advance_interval_ms, 2500);
        assert_eq!(config.carousel.drag_dead_zone_px, 10.0);
        assert_eq!(config.carousel.breakpoints, Breakpoints::default());
        assert_eq!(config.pager, PagerConfig::default());
    }

    #[test]
    fn test_rejects_unordered_breakpoints() {
        let err = CarouselConfig::from_json_str(r#"{"breakpoints": {"mobile": 1100}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_tier() {
        let err = CarouselConfig::from_json_str(r#"{"cards_per_view": {"tablet": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SiteConfig::from_json_str("{carousel").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_video_and_login_defaults() {
        let config = SiteConfig::from_json_str(r#"{"video": {"youtube_id": ""}}"#).unwrap();
        assert_eq!(config.video.youtube_id, "");
        assert_eq!(config.video.mobile_max_width, 768.0);
        assert_eq!(config.login.alert_dismiss_ms, 5000);

        let err = SiteConfig::from_json_str(r#"{"video": {"visible_threshold": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
