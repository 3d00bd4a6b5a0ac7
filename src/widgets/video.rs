// 紹介動画の埋め込み
// 幅に応じてモバイル用 / デスクトップ用のコンテナを使い分ける

use crate::config::VideoConfig;

pub const DESKTOP_CONTAINER_ID: &str = "video-container";
pub const MOBILE_CONTAINER_ID: &str = "video-container-mobile";
pub const PLACEHOLDER_ID: &str = "video-placeholder";
pub const IFRAME_CLASS: &str = "w-full h-full rounded-2xl";

#[derive(Debug, Clone)]
pub struct VideoEmbed {
    config: VideoConfig,
}

impl VideoEmbed {
    pub fn new(config: VideoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn is_mobile(&self, viewport_width: f32) -> bool {
        viewport_width < self.config.mobile_max_width
    }

    pub fn container_id(&self, viewport_width: f32) -> &'static str {
        if self.is_mobile(viewport_width) {
            MOBILE_CONTAINER_ID
        } else {
            DESKTOP_CONTAINER_ID
        }
    }

    /// 動画 ID が空なら埋め込まない
    pub fn embed_url(&self) -> Option<String> {
        let id = self.config.youtube_id.trim();
        if id.is_empty() {
            return None;
        }
        Some(format!(
            "https://www.youtube.com/embed/{id}?autoplay=1&mute=1&loop=1&playlist={id}&rel=0&modestbranding=1&controls=1"
        ))
    }

    /// コンテナの縦方向の見えている割合が閾値以上か
    pub fn is_visible_enough(&self, rect_top: f32, rect_height: f32, viewport_height: f32) -> bool {
        if rect_height <= 0.0 {
            return false;
        }
        let visible = (rect_top + rect_height).min(viewport_height) - rect_top.max(0.0);
        visible.max(0.0) / rect_height >= self.config.visible_threshold
    }

    /// リサイズ後、今の幅に対応するコンテナにまだ iframe が無ければ作り直す
    pub fn needs_embed(&self, viewport_width: f32, has_mobile_iframe: bool, has_desktop_iframe: bool) -> bool {
        if self.is_mobile(viewport_width) {
            !has_mobile_iframe
        } else {
            !has_desktop_iframe
        }
    }
}
