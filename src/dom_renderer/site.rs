// サイト全体の部品（サイドバー、アバター、ログイン、動画）のDOMバインディング（WASM環境）

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, FileReader, HtmlElement, HtmlImageElement, HtmlInputElement,
    KeyboardEvent, Node, Window,
};

use super::dom::{Listener, collect_html, html_by_id, query_html, viewport_width};
use crate::config::SiteConfig;
use crate::engine::TimerHandle;
use crate::widgets::login::{EYE_CLASS, EYE_SLASH_CLASS};
use crate::widgets::sidebar::{SUBMENU_OPEN_CLASS, SUBMENU_PANEL_PREFIX};
use crate::widgets::video::{DESKTOP_CONTAINER_ID, IFRAME_CLASS, MOBILE_CONTAINER_ID, PLACEHOLDER_ID};
use crate::widgets::{
    AvatarPreview, LoginMode, PasswordVisibility, Sidebar, SidebarChange, VideoEmbed,
};

const HIDDEN_CLASS: &str = "hidden";

fn detach_all(listeners: &[Listener]) {
    for listener in listeners {
        listener.detach();
    }
}

fn set_flag_attr(el: &Element, name: &str, value: bool) {
    let _ = el.set_attribute(name, if value { "true" } else { "false" });
}

// ========================================
// サイドバーとサブメニュー
// ========================================

struct SidebarState {
    sidebar: Sidebar,
    root: HtmlElement,
    inner: Option<HtmlElement>,
    main_menu: Option<HtmlElement>,
    toggle: Option<HtmlInputElement>,
    open_buttons: Vec<(HtmlElement, String)>,
    panels: Vec<HtmlElement>,
}

impl SidebarState {
    fn apply(&self, change: SidebarChange) {
        if change == SidebarChange::Unchanged {
            return;
        }
        let submenu_open = self.sidebar.is_submenu_open();
        let _ = self
            .root
            .class_list()
            .toggle_with_force(SUBMENU_OPEN_CLASS, submenu_open);
        if let Some(inner) = &self.inner {
            let _ = inner.class_list().toggle_with_force(SUBMENU_OPEN_CLASS, submenu_open);
        }
        for panel in &self.panels {
            let id = panel.id();
            let hidden = id
                .strip_prefix(SUBMENU_PANEL_PREFIX)
                .map(|name| self.sidebar.panel_hidden(name))
                .unwrap_or(true);
            set_flag_attr(panel, "aria-hidden", hidden);
        }
        for (button, name) in &self.open_buttons {
            set_flag_attr(button, "aria-expanded", self.sidebar.is_expanded(name));
        }
        if let Some(toggle) = &self.toggle {
            if toggle.checked() != self.sidebar.is_open() {
                toggle.set_checked(self.sidebar.is_open());
            }
        }
        if change == SidebarChange::ReturnedToMain {
            if let Some(main) = &self.main_menu {
                let _ = main.focus();
            }
        }
    }

    fn update(&mut self, f: impl FnOnce(&mut Sidebar) -> SidebarChange) {
        let change = f(&mut self.sidebar);
        self.apply(change);
    }
}

fn with_sidebar(state: &Rc<RefCell<SidebarState>>, f: impl FnOnce(&mut Sidebar) -> SidebarChange) {
    if let Ok(mut s) = state.try_borrow_mut() {
        s.update(f);
    }
}

/// クリック位置がトグル（チェックボックスかそのラベル）の上か
fn is_on_toggle(target: &Element) -> bool {
    target.id() == "sidebar-toggle"
        || target
            .closest("#sidebar-toggle-label")
            .ok()
            .flatten()
            .is_some()
}

pub struct DomSidebar {
    listeners: Vec<Listener>,
}

impl DomSidebar {
    pub fn mount(document: &Document) -> Option<Self> {
        let root = html_by_id(document, "sidebar")?;
        let toggle = document
            .get_element_by_id("sidebar-toggle")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        let open_buttons: Vec<(HtmlElement, String)> = collect_html(&root, "[data-open-submenu]")
            .into_iter()
            .filter_map(|b| {
                let name = b.get_attribute("data-open-submenu")?;
                Some((b, name))
            })
            .collect();
        let back_buttons = collect_html(&root, "[data-back-button]");

        let mut sidebar = Sidebar::new();
        sidebar.toggle_changed(toggle.as_ref().map(|t| t.checked()).unwrap_or(false));
        let state = Rc::new(RefCell::new(SidebarState {
            sidebar,
            inner: html_by_id(document, "sidebar-inner"),
            main_menu: html_by_id(document, "main-menu"),
            toggle: toggle.clone(),
            open_buttons: open_buttons.clone(),
            panels: collect_html(&root, ".submenu-panel"),
            root: root.clone(),
        }));

        let mut listeners = Vec::new();
        for (button, name) in open_buttons {
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(button.as_ref(), "click", move |e: Event| {
                e.prevent_default();
                with_sidebar(&state, |s| s.open_submenu(&name));
            }));
        }
        for button in back_buttons {
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(button.as_ref(), "click", move |e: Event| {
                e.prevent_default();
                with_sidebar(&state, |s| s.back_to_main());
            }));
        }
        if let Some(toggle) = toggle {
            let state = Rc::clone(&state);
            let input = toggle.clone();
            listeners.push(Listener::attach(toggle.as_ref(), "change", move |_| {
                let checked = input.checked();
                with_sidebar(&state, |s| s.toggle_changed(checked));
            }));
        }

        let key_state = Rc::clone(&state);
        listeners.push(Listener::attach(document.as_ref(), "keydown", move |e: Event| {
            let is_escape = e
                .dyn_ref::<KeyboardEvent>()
                .map(|k| k.key() == "Escape")
                .unwrap_or(false);
            if is_escape {
                with_sidebar(&key_state, |s| s.escape());
            }
        }));

        let click_state = Rc::clone(&state);
        let sidebar_node: Node = root.clone().into();
        listeners.push(Listener::attach(document.as_ref(), "click", move |e: Event| {
            let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let inside = sidebar_node.contains(Some(target.as_ref()));
            let on_toggle = is_on_toggle(&target);
            with_sidebar(&click_state, |s| s.document_clicked(inside, on_toggle));
        }));

        log::info!("sidebar mounted");
        Some(Self { listeners })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
    }
}

// ========================================
// アバターのアップロードプレビュー
// ========================================

struct AvatarSlot {
    preview: AvatarPreview,
    image: Option<HtmlImageElement>,
    default_icon: Option<HtmlElement>,
    reader: Option<(FileReader, Closure<dyn FnMut()>)>,
}

impl AvatarSlot {
    fn apply(&self) {
        if let (Some(image), Some(src)) = (&self.image, self.preview.image_src()) {
            image.set_src(src);
        }
        if let Some(image) = &self.image {
            let _ = image
                .class_list()
                .toggle_with_force(HIDDEN_CLASS, self.preview.image_hidden());
        }
        if let Some(icon) = &self.default_icon {
            let _ = icon
                .class_list()
                .toggle_with_force(HIDDEN_CLASS, self.preview.default_icon_hidden());
        }
    }

    /// 読み込み中の FileReader を止めてコールバックを外す
    fn abort_read(&mut self) {
        if let Some((reader, _onload)) = self.reader.take() {
            reader.set_onload(None);
            reader.abort();
        }
    }
}

fn start_read(slot: &Rc<RefCell<AvatarSlot>>, input: &HtmlInputElement) {
    let file = input.files().and_then(|files| files.get(0));
    let Ok(mut s) = slot.try_borrow_mut() else {
        return;
    };
    let Some(read) = s.preview.file_selected(file.is_some()) else {
        return;
    };
    let Some(file) = file else {
        return;
    };
    s.abort_read();

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("FileReader unavailable: {:?}", e);
            return;
        }
    };
    let weak: Weak<RefCell<AvatarSlot>> = Rc::downgrade(slot);
    let result_reader = reader.clone();
    let onload = Closure::wrap(Box::new(move || {
        let Some(slot) = weak.upgrade() else {
            return;
        };
        let Ok(mut s) = slot.try_borrow_mut() else {
            return;
        };
        let Some(data_url) = result_reader.result().ok().and_then(|v| v.as_string()) else {
            return;
        };
        if s.preview.loaded(read, data_url) {
            s.apply();
        }
    }) as Box<dyn FnMut()>);
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    if let Err(e) = reader.read_as_data_url(&file) {
        log::warn!("failed to read avatar file: {:?}", e);
        reader.set_onload(None);
        return;
    }
    s.reader = Some((reader, onload));
}

pub struct DomAvatar {
    listeners: Vec<Listener>,
    slots: Vec<Rc<RefCell<AvatarSlot>>>,
}

impl DomAvatar {
    pub fn mount(document: &Document) -> Option<Self> {
        let root = document.document_element()?;
        let inputs: Vec<HtmlInputElement> = collect_html(&root, ".upload-input")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .collect();
        if inputs.is_empty() {
            return None;
        }

        let mut listeners = Vec::new();
        let mut slots = Vec::new();
        for input in inputs {
            // プレビューは入力の直後の要素の中にある
            let container = input.next_element_sibling();
            let slot = Rc::new(RefCell::new(AvatarSlot {
                preview: AvatarPreview::new(),
                image: container
                    .as_ref()
                    .and_then(|c| c.query_selector(".uploaded-img").ok().flatten())
                    .and_then(|el| el.dyn_into::<HtmlImageElement>().ok()),
                default_icon: container.as_ref().and_then(|c| query_html(c, ".default-avatar")),
                reader: None,
            }));
            let change_slot = Rc::clone(&slot);
            let change_input = input.clone();
            listeners.push(Listener::attach(input.as_ref(), "change", move |_| {
                start_read(&change_slot, &change_input);
            }));
            slots.push(slot);
        }
        log::info!("avatar upload mounted ({} inputs)", slots.len());
        Some(Self { listeners, slots })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
        for slot in self.slots.drain(..) {
            if let Ok(mut s) = slot.try_borrow_mut() {
                s.abort_read();
            }
        }
    }
}

// ========================================
// ログイン画面の切り替えとパスワード表示
// ========================================

struct LoginElements {
    regular: HtmlElement,
    dashboard: HtmlElement,
    title: Option<HtmlElement>,
    subtitle: Option<HtmlElement>,
}

impl LoginElements {
    fn show(&self, mode: LoginMode) {
        let view = mode.view();
        let _ = self.regular.style().set_property("display", view.regular_display);
        let _ = self.dashboard.style().set_property("display", view.dashboard_display);
        if let Some(title) = &self.title {
            title.set_text_content(Some(view.title));
        }
        if let Some(subtitle) = &self.subtitle {
            subtitle.set_text_content(Some(view.subtitle));
        }
    }
}

fn lock_body_scroll(document: &Document) {
    if let Some(body) = document.body() {
        let _ = body.style().set_property("overflow", "hidden");
    }
}

pub struct DomLogin {
    elements: LoginElements,
    listeners: Vec<Listener>,
    window: Window,
    alert_timer: Option<TimerHandle>,
    _on_alert_timeout: Closure<dyn FnMut()>,
}

impl DomLogin {
    pub fn mount(window: &Window, document: &Document, site: &SiteConfig) -> Option<Self> {
        let elements = LoginElements {
            regular: html_by_id(document, "regular-login")?,
            dashboard: html_by_id(document, "dashboard-login")?,
            title: html_by_id(document, "login-title"),
            subtitle: html_by_id(document, "login-subtitle"),
        };
        let search = window.location().search().unwrap_or_default();
        let mode = LoginMode::from_query(&search);
        elements.show(mode);
        lock_body_scroll(document);

        let mut listeners = Vec::new();
        let pairs = [
            (&elements.regular, "password"),
            (&elements.dashboard, "dashboard_password"),
        ];
        for (form, input_id) in pairs {
            let Some(icon) = query_html(form, ".password-toggle") else {
                continue;
            };
            let Some(input) = document
                .get_element_by_id(input_id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let visibility = Rc::new(RefCell::new(PasswordVisibility::default()));
            let target = icon.clone();
            listeners.push(Listener::attach(icon.as_ref(), "click", move |_| {
                let Ok(mut v) = visibility.try_borrow_mut() else {
                    return;
                };
                v.toggle();
                input.set_type(v.input_type());
                let (add, remove) = v.icon_classes();
                let _ = target.class_list().remove_1(remove);
                let _ = target.class_list().add_1(add);
            }));
        }

        let doc = document.clone();
        listeners.push(Listener::attach(window.as_ref(), "resize", move |_| {
            lock_body_scroll(&doc);
        }));

        // サーバーからのお知らせは一定時間後に消す
        let doc = document.clone();
        let on_alert_timeout = Closure::wrap(Box::new(move || {
            let Some(root) = doc.document_element() else {
                return;
            };
            for alert in collect_html(&root, ".alert") {
                alert.remove();
            }
        }) as Box<dyn FnMut()>);
        let alert_timer = match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_alert_timeout.as_ref().unchecked_ref(),
            site.login.alert_dismiss_ms as i32,
        ) {
            Ok(id) => Some(TimerHandle(id)),
            Err(e) => {
                log::warn!("setTimeout failed: {:?}", e);
                None
            }
        };

        log::info!("login mounted ({:?})", mode);
        Some(Self {
            elements,
            listeners,
            window: window.clone(),
            alert_timer,
            _on_alert_timeout: on_alert_timeout,
        })
    }

    pub fn show(&self, mode: LoginMode) {
        self.elements.show(mode);
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
        if let Some(handle) = self.alert_timer.take() {
            self.window.clear_timeout_with_handle(handle.0);
        }
    }
}

// ========================================
// 紹介動画
// ========================================

struct VideoState {
    embed: VideoEmbed,
    window: Window,
    document: Document,
    /// 表示待ちの iframe
    waiting: Option<HtmlElement>,
}

impl VideoState {
    fn has_iframe(&self, container_id: &str) -> bool {
        self.document
            .get_element_by_id(container_id)
            .and_then(|c| c.query_selector("iframe").ok().flatten())
            .is_some()
    }

    fn embed_into_current(&mut self) {
        let width = viewport_width(&self.window);
        let Some(url) = self.embed.embed_url() else {
            return;
        };
        let Some(container) = self.document.get_element_by_id(self.embed.container_id(width)) else {
            return;
        };
        if let Ok(old) = container.query_selector_all("iframe") {
            for i in 0..old.length() {
                if let Some(el) = old.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
        if let Some(placeholder) = container
            .query_selector(&format!("#{}", PLACEHOLDER_ID))
            .ok()
            .flatten()
        {
            placeholder.remove();
        }

        let Some(iframe) = self
            .document
            .create_element("iframe")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let _ = iframe.set_attribute("src", &url);
        let _ = iframe.set_attribute("allow", "autoplay; encrypted-media");
        let _ = iframe.set_attribute("allowfullscreen", "");
        let _ = iframe.set_attribute("frameborder", "0");
        iframe.set_class_name(IFRAME_CLASS);
        let _ = iframe.style().set_property("display", "none");
        if let Err(e) = container.append_child(&iframe) {
            log::warn!("failed to append video iframe: {:?}", e);
            return;
        }
        log::debug!("video embedded into #{}", container.id());
        self.waiting = Some(iframe);
        self.reveal_if_visible();
    }

    /// 待っている iframe のコンテナが十分見えていれば表示する
    fn reveal_if_visible(&mut self) {
        let Some(iframe) = &self.waiting else {
            return;
        };
        let Some(container) = iframe.parent_element() else {
            return;
        };
        let rect = container.get_bounding_client_rect();
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;
        if self
            .embed
            .is_visible_enough(rect.top() as f32, rect.height() as f32, viewport_height)
        {
            let _ = iframe.style().set_property("display", "block");
            self.waiting = None;
        }
    }

    fn resized(&mut self) {
        let width = viewport_width(&self.window);
        let has_mobile = self.has_iframe(MOBILE_CONTAINER_ID);
        let has_desktop = self.has_iframe(DESKTOP_CONTAINER_ID);
        if self.embed.needs_embed(width, has_mobile, has_desktop) {
            self.embed_into_current();
        } else {
            self.reveal_if_visible();
        }
    }
}

pub struct DomVideo {
    listeners: Vec<Listener>,
}

impl DomVideo {
    pub fn mount(window: &Window, document: &Document, site: &SiteConfig) -> Option<Self> {
        if document.get_element_by_id(DESKTOP_CONTAINER_ID).is_none()
            && document.get_element_by_id(MOBILE_CONTAINER_ID).is_none()
        {
            return None;
        }
        let state = Rc::new(RefCell::new(VideoState {
            embed: VideoEmbed::new(site.video.clone()),
            window: window.clone(),
            document: document.clone(),
            waiting: None,
        }));
        state.borrow_mut().embed_into_current();

        let mut listeners = Vec::new();
        let scroll_state = Rc::clone(&state);
        listeners.push(Listener::attach(window.as_ref(), "scroll", move |_| {
            if let Ok(mut s) = scroll_state.try_borrow_mut() {
                s.reveal_if_visible();
            }
        }));
        let resize_state = Rc::clone(&state);
        listeners.push(Listener::attach(window.as_ref(), "resize", move |_| {
            if let Ok(mut s) = resize_state.try_borrow_mut() {
                s.resized();
            }
        }));
        log::info!("video mounted");
        Some(Self { listeners })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
    }
}
