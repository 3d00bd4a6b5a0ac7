// WASM専用のエントリーポイント

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::dom_renderer::dom::read_site_config;
use crate::dom_renderer::{
    DomAccordion, DomAvatar, DomCarousel, DomExpander, DomLogin, DomPager, DomPricing, DomSidebar,
    DomVideo,
};
use crate::widgets::LoginMode;

static INIT: Once = Once::new();

fn init_browser_logging() {
    INIT.call_once(|| {
        // パニック時のエラーメッセージをブラウザコンソールに表示
        console_error_panic_hook::set_once();

        // WebAssembly用のロガーを初期化
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {}", e).into());
        }
    });
}

/// ページ上にマウントしたウィジェット一式
#[wasm_bindgen]
pub struct PageWidgets {
    carousel: Option<DomCarousel>,
    pager: Option<DomPager>,
    accordion: Option<DomAccordion>,
    pricing: Option<DomPricing>,
    expander: Option<DomExpander>,
    sidebar: Option<DomSidebar>,
    avatar: Option<DomAvatar>,
    login: Option<DomLogin>,
    video: Option<DomVideo>,
}

#[wasm_bindgen]
impl PageWidgets {
    /// 現在のカルーセルの index（カルーセルが無ければ undefined）
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> Option<u32> {
        self.carousel
            .as_ref()
            .and_then(|c| c.current_index())
            .map(|i| i as u32)
    }

    /// ログイン画面を通常ログインに切り替える
    #[wasm_bindgen(js_name = showRegularLogin)]
    pub fn show_regular_login(&self) {
        if let Some(login) = &self.login {
            login.show(LoginMode::Regular);
        }
    }

    #[wasm_bindgen(js_name = showDashboardLogin)]
    pub fn show_dashboard_login(&self) {
        if let Some(login) = &self.login {
            login.show(LoginMode::Dashboard);
        }
    }

    /// タイマーを止めてリスナーを全部外す
    pub fn destroy(&mut self) {
        if let Some(carousel) = self.carousel.take() {
            carousel.destroy();
        }
        if let Some(mut pager) = self.pager.take() {
            pager.destroy();
        }
        if let Some(mut accordion) = self.accordion.take() {
            accordion.destroy();
        }
        if let Some(mut pricing) = self.pricing.take() {
            pricing.destroy();
        }
        if let Some(mut expander) = self.expander.take() {
            expander.destroy();
        }
        if let Some(mut sidebar) = self.sidebar.take() {
            sidebar.destroy();
        }
        if let Some(mut avatar) = self.avatar.take() {
            avatar.destroy();
        }
        if let Some(mut login) = self.login.take() {
            login.destroy();
        }
        if let Some(mut video) = self.video.take() {
            video.destroy();
        }
        log::info!("page widgets destroyed");
    }
}

/// DOM からウィジェットを探してマウントする。見つからないものは無視
#[wasm_bindgen]
pub fn mount() -> Result<PageWidgets, JsValue> {
    init_browser_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let site = read_site_config(&document);

    let widgets = PageWidgets {
        carousel: DomCarousel::mount(&window, &document, &site),
        pager: DomPager::mount(&window, &document, &site),
        accordion: DomAccordion::mount(&document),
        pricing: DomPricing::mount(&document),
        expander: DomExpander::mount(&window, &document, &site),
        sidebar: DomSidebar::mount(&document),
        avatar: DomAvatar::mount(&document),
        login: DomLogin::mount(&window, &document, &site),
        video: DomVideo::mount(&window, &document, &site),
    };
    log::info!(
        "slidekit mounted (carousel: {}, pager: {}, faq: {}, pricing: {}, expander: {}, sidebar: {}, avatar: {}, login: {}, video: {})",
        widgets.carousel.is_some(),
        widgets.pager.is_some(),
        widgets.accordion.is_some(),
        widgets.pricing.is_some(),
        widgets.expander.is_some(),
        widgets.sidebar.is_some(),
        widgets.avatar.is_some(),
        widgets.login.is_some(),
        widgets.video.is_some()
    );
    Ok(widgets)
}
