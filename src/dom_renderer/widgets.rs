// カルーセル以外のウィジェットのDOMバインディング（WASM環境）

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, Window};

use super::dom::{DomScheduler, Listener, collect_html, query_html, viewport_width};
use crate::config::SiteConfig;
use crate::engine::TimerHandle;
use crate::widgets::expander::MinHeight;
use crate::widgets::{
    Accordion, BillingPeriod, HeightEqualizer, PagerScroll, PriceDisplay, PricingToggle, ReadMore,
    ResizeDebounce, TestimonialPager,
};

const PAGER_TRACK: &str = ".carousel-track";
const PAGER_SLIDE: &str = ".group";
const FAQ_ITEM: &str = ".faq-item";
const HIDDEN_CLASS: &str = "hidden";
const EXPANDED_CLASS: &str = "expanded";

fn detach_all(listeners: &[Listener]) {
    for listener in listeners {
        listener.detach();
    }
}

// ========================================
// テスティモニアルのページャ
// ========================================

struct PagerMounted {
    pager: TestimonialPager<DomScheduler>,
    track: HtmlElement,
    window: Window,
    _on_tick: Closure<dyn FnMut()>,
}

impl PagerMounted {
    fn scroll_to(&self, scroll: PagerScroll) {
        let options = web_sys::ScrollToOptions::new();
        options.set_left(f64::from(scroll.left_px));
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        self.track.scroll_to_with_scroll_to_options(&options);
    }
}

type PagerSlot = Rc<RefCell<Option<PagerMounted>>>;

fn with_pager(weak: &Weak<RefCell<Option<PagerMounted>>>, f: impl FnOnce(&mut PagerMounted)) {
    let Some(slot) = weak.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(mounted) = guard.as_mut() {
        f(mounted);
    }
}

pub struct DomPager {
    slot: PagerSlot,
    listeners: Vec<Listener>,
}

impl DomPager {
    pub fn mount(window: &Window, document: &Document, site: &SiteConfig) -> Option<Self> {
        let track = query_html(&document.document_element()?, PAGER_TRACK)?;
        let slot: PagerSlot = Rc::new(RefCell::new(None));
        let weak = Rc::downgrade(&slot);

        let tick_ref = weak.clone();
        let on_tick = Closure::wrap(Box::new(move || {
            with_pager(&tick_ref, |m| {
                let page_width = m.track.client_width() as f32;
                let scroll = m.pager.tick(page_width);
                m.scroll_to(scroll);
            });
        }) as Box<dyn FnMut()>);
        let scheduler = DomScheduler::new(window.clone(), &on_tick, None);

        let slide_count = track.child_element_count() as usize;
        let mut pager =
            TestimonialPager::new(site.pager.clone(), slide_count, viewport_width(window), scheduler);

        let mut listeners = Vec::new();
        for slide in collect_html(&track, PAGER_SLIDE) {
            let w = weak.clone();
            listeners.push(Listener::attach(slide.as_ref(), "click", move |_| {
                with_pager(&w, |m| m.pager.slide_clicked());
            }));
            let w = weak.clone();
            listeners.push(Listener::attach(slide.as_ref(), "mouseleave", move |_| {
                with_pager(&w, |m| m.pager.slide_left());
            }));
        }
        let w = weak.clone();
        listeners.push(Listener::attach(window.as_ref(), "resize", move |_| {
            with_pager(&w, |m| {
                let width = viewport_width(&m.window);
                let page_width = m.track.client_width() as f32;
                if let Some(scroll) = m.pager.resize(width, page_width) {
                    m.scroll_to(scroll);
                }
            });
        }));

        pager.start();
        *slot.borrow_mut() = Some(PagerMounted {
            pager,
            track,
            window: window.clone(),
            _on_tick: on_tick,
        });
        log::info!("testimonial pager mounted ({} slides)", slide_count);
        Some(Self { slot, listeners })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
        if let Ok(mut guard) = self.slot.try_borrow_mut() {
            if let Some(mut mounted) = guard.take() {
                mounted.pager.destroy();
            }
        }
    }
}

// ========================================
// FAQ アコーディオン
// ========================================

struct FaqItem {
    content: Option<HtmlElement>,
    icon: Option<HtmlElement>,
}

struct AccordionState {
    accordion: Accordion,
    items: Vec<FaqItem>,
}

impl AccordionState {
    fn apply(&self) {
        for (i, item) in self.items.iter().enumerate() {
            let open = self.accordion.is_open(i);
            if let Some(content) = &item.content {
                let _ = content.class_list().toggle_with_force(HIDDEN_CLASS, !open);
            }
            if let Some(icon) = &item.icon {
                icon.set_text_content(Some(self.accordion.icon(i)));
            }
        }
    }
}

pub struct DomAccordion {
    listeners: Vec<Listener>,
}

impl DomAccordion {
    pub fn mount(document: &Document) -> Option<Self> {
        let root = document.document_element()?;
        let elements = collect_html(&root, FAQ_ITEM);
        if elements.is_empty() {
            return None;
        }

        let mut items = Vec::new();
        let mut buttons = Vec::new();
        for el in &elements {
            let button = query_html(el, "button");
            items.push(FaqItem {
                content: query_html(el, "div.hidden"),
                icon: button.as_ref().and_then(|b| query_html(b, ".text-pink-500")),
            });
            buttons.push(button);
        }
        let state = Rc::new(RefCell::new(AccordionState {
            accordion: Accordion::new(items.len()),
            items,
        }));

        let mut listeners = Vec::new();
        for (i, button) in buttons.into_iter().enumerate() {
            let Some(button) = button else {
                continue;
            };
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(button.as_ref(), "click", move |_| {
                if let Ok(mut s) = state.try_borrow_mut() {
                    s.accordion.toggle(i);
                    s.apply();
                }
            }));
        }
        Some(Self { listeners })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
    }
}

// ========================================
// 料金表の切り替え
// ========================================

pub struct DomPricing {
    listeners: Vec<Listener>,
}

fn apply_prices(root: &Element, shown: PriceDisplay) {
    for el in collect_html(root, ".price-monthly") {
        let _ = el.style().set_property("display", shown.monthly);
    }
    for el in collect_html(root, ".price-yearly") {
        let _ = el.style().set_property("display", shown.yearly);
    }
}

impl DomPricing {
    pub fn mount(document: &Document) -> Option<Self> {
        let monthly = document
            .get_element_by_id("bill-monthly")?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        let yearly = document
            .get_element_by_id("bill-yearly")?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        let root = document.document_element()?;

        let initial = if monthly.checked() {
            BillingPeriod::Monthly
        } else {
            BillingPeriod::Yearly
        };
        let toggle = Rc::new(RefCell::new(PricingToggle::new(initial)));

        let mut listeners = Vec::new();
        for input in [&monthly, &yearly] {
            let monthly = monthly.clone();
            let root = root.clone();
            let toggle = Rc::clone(&toggle);
            listeners.push(Listener::attach(input.as_ref(), "change", move |_: Event| {
                let Ok(mut toggle) = toggle.try_borrow_mut() else {
                    return;
                };
                if let Some(shown) = toggle.radio_changed(monthly.checked()) {
                    apply_prices(&root, shown);
                }
            }));
        }
        Some(Self { listeners })
    }

    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
    }
}

// ========================================
// Read More と高さ揃え
// ========================================

struct ExpanderState {
    read_more: ReadMore,
    equalizer: HeightEqualizer,
    document: Document,
    debounce: ResizeDebounce,
}

impl ExpanderState {
    fn card_containers(&self) -> Vec<HtmlElement> {
        let Some(root) = self.document.document_element() else {
            return Vec::new();
        };
        collect_html(&root, &format!("{} > {}", PAGER_TRACK, PAGER_SLIDE))
            .iter()
            .filter_map(|group| query_html(group, ".relative.overflow-hidden.rounded-2xl"))
            .collect()
    }

    /// 全カードを折りたたんだ状態で測り、共通の min-height を設定する
    fn equalize(&mut self) {
        let containers = self.card_containers();
        let mut heights = Vec::with_capacity(containers.len());
        let mut expanded = Vec::with_capacity(containers.len());
        for c in &containers {
            let _ = c.style().set_property("min-height", "");
            let text = query_html(c, ".testimonial-text");
            let was_expanded = text
                .as_ref()
                .map(|t| t.class_list().contains(EXPANDED_CLASS))
                .unwrap_or(false);
            if let (true, Some(t)) = (was_expanded, &text) {
                let _ = t.class_list().remove_1(EXPANDED_CLASS);
            }
            heights.push(c.offset_height() as f32);
            if let (true, Some(t)) = (was_expanded, &text) {
                let _ = t.class_list().add_1(EXPANDED_CLASS);
            }
            expanded.push(was_expanded);
        }
        let min_heights = self.equalizer.equalize(&heights, &expanded);
        for (c, h) in containers.iter().zip(min_heights) {
            let _ = c.style().set_property("min-height", &h.css_value());
        }
        log::debug!("equalized {} cards to {}px", containers.len(), self.equalizer.shared_min_height());
    }
}

pub struct DomExpander {
    listeners: Vec<Listener>,
    state: Rc<RefCell<ExpanderState>>,
    window: Window,
    _on_resize_done: Closure<dyn FnMut()>,
}

impl DomExpander {
    pub fn mount(window: &Window, document: &Document, site: &SiteConfig) -> Option<Self> {
        let root = document.document_element()?;
        let buttons = collect_html(&root, ".read-more");
        let state = Rc::new(RefCell::new(ExpanderState {
            read_more: ReadMore::new(buttons.len()),
            equalizer: HeightEqualizer::new(),
            document: document.clone(),
            debounce: ResizeDebounce::default(),
        }));

        let resize_state = Rc::clone(&state);
        let on_resize_done = Closure::wrap(Box::new(move || {
            if let Ok(mut s) = resize_state.try_borrow_mut() {
                s.debounce.fired();
                s.equalize();
            }
        }) as Box<dyn FnMut()>);

        let mut listeners = Vec::new();
        for (i, button) in buttons.into_iter().enumerate() {
            let text_block = button
                .previous_element_sibling()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            let container = button
                .closest(".p-5")
                .ok()
                .flatten()
                .and_then(|el| el.parent_element())
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            let state = Rc::clone(&state);
            let btn = button.clone();
            listeners.push(Listener::attach(button.as_ref(), "click", move |_| {
                let Ok(mut s) = state.try_borrow_mut() else {
                    return;
                };
                let expanded = s.read_more.toggle(i);
                if let Some(text) = &text_block {
                    let _ = text.class_list().toggle_with_force(EXPANDED_CLASS, expanded);
                    if let Some(fade) = query_html(text, ".fade") {
                        let _ = fade
                            .class_list()
                            .toggle_with_force(HIDDEN_CLASS, s.read_more.fade_hidden(i));
                    }
                }
                btn.set_text_content(Some(s.read_more.label(i)));
                if let Some(container) = &container {
                    let min_height: MinHeight = s.equalizer.after_toggle(expanded);
                    let _ = container.style().set_property("min-height", &min_height.css_value());
                }
            }));
        }

        // リサイズは少し待ってからまとめて揃え直す
        let delay = site.expander.resize_debounce_ms as i32;
        let win = window.clone();
        let resize_state = Rc::clone(&state);
        let callback = on_resize_done.as_ref().clone();
        listeners.push(Listener::attach(window.as_ref(), "resize", move |_| {
            let Ok(mut s) = resize_state.try_borrow_mut() else {
                return;
            };
            match win.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay) {
                Ok(id) => {
                    if let Some(old) = s.debounce.schedule(TimerHandle(id)) {
                        win.clear_timeout_with_handle(old.0);
                    }
                }
                Err(e) => log::warn!("setTimeout failed: {:?}", e),
            }
        }));
        let load_state = Rc::clone(&state);
        listeners.push(Listener::attach(window.as_ref(), "load", move |_| {
            if let Ok(mut s) = load_state.try_borrow_mut() {
                s.equalize();
            }
        }));

        // load 済みならすぐに揃える
        if document.ready_state() == "complete" {
            state.borrow_mut().equalize();
        }
        Some(Self {
            listeners,
            state,
            window: window.clone(),
            _on_resize_done: on_resize_done,
        })
    }

    /// 待ち中のタイマーも取り消す（コールバックはこの後 drop される）
    pub fn destroy(&mut self) {
        detach_all(&self.listeners);
        self.listeners.clear();
        if let Ok(mut s) = self.state.try_borrow_mut() {
            if let Some(handle) = s.debounce.cancel() {
                self.window.clear_timeout_with_handle(handle.0);
            }
        }
    }
}
