// DOM アダプタ（WASM環境）
//
// エンジンが返した TrackFrame をページに反映し、ブラウザのイベントを
// CarouselEvent に変換して戻す。タイマーは setInterval、ドラッグ中の
// フレームは requestAnimationFrame で実装する。

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent,
    Window,
};

use super::markup;
use crate::config::{CarouselConfig, SiteConfig};
use crate::engine::{Carousel, FrameHandle, Scheduler, TimerHandle, TrackFrame, TrackGeometry};
use crate::ui::event::{CarouselEvent, EventQueue, NavKey, is_activation_key};

/// 登録したイベントリスナー。destroy 時に外す
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(e) =
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to add {} listener: {:?}", kind, e);
        }
        Self {
            target: target.clone(),
            kind,
            callback,
        }
    }

    pub(crate) fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// setInterval / requestAnimationFrame によるスケジューラ
///
/// コールバックのクロージャはウィジェット側が所有し、ここでは参照だけ持つ。
pub(crate) struct DomScheduler {
    window: Window,
    on_interval: JsValue,
    on_frame: JsValue,
}

impl DomScheduler {
    pub(crate) fn new(
        window: Window,
        on_interval: &Closure<dyn FnMut()>,
        on_frame: Option<&Closure<dyn FnMut()>>,
    ) -> Self {
        Self {
            window,
            on_interval: on_interval.as_ref().clone(),
            on_frame: on_frame
                .map(|c| c.as_ref().clone())
                .unwrap_or(JsValue::UNDEFINED),
        }
    }
}

impl Scheduler for DomScheduler {
    fn start_interval(&mut self, interval_ms: u32) -> TimerHandle {
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.on_interval.unchecked_ref(),
                interval_ms as i32,
            )
            .unwrap_or_else(|e| {
                log::warn!("setInterval failed: {:?}", e);
                -1
            });
        TimerHandle(id)
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        self.window.clear_interval_with_handle(handle.0);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let id = self
            .window
            .request_animation_frame(self.on_frame.unchecked_ref())
            .unwrap_or_else(|e| {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                -1
            });
        FrameHandle(id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

// ========================================
// DOM ユーティリティ
// ========================================

pub(crate) fn viewport_width(window: &Window) -> f32 {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0) as f32
}

pub(crate) fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

/// セレクタに一致する要素を HtmlElement として集める
pub(crate) fn collect_html(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub(crate) fn query_html(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// body の属性からサイト設定を読む。無ければデフォルト
pub(crate) fn read_site_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .body()
        .and_then(|body| body.get_attribute(markup::SITE_CONFIG_ATTR))
    else {
        return SiteConfig::default();
    };
    SiteConfig::from_json_str(&raw).unwrap_or_else(|e| {
        log::warn!("ignoring site config: {}", e);
        SiteConfig::default()
    })
}

fn read_carousel_config(track: &Element, fallback: &CarouselConfig) -> CarouselConfig {
    let Some(raw) = track.get_attribute(markup::CONFIG_ATTR) else {
        return fallback.clone();
    };
    CarouselConfig::from_json_str(&raw).unwrap_or_else(|e| {
        log::warn!("ignoring carousel config: {}", e);
        fallback.clone()
    })
}

fn touch_x(event: &Event) -> Option<f32> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(touch.client_x() as f32)
}

fn mouse_x(event: &Event) -> Option<f32> {
    event.dyn_ref::<MouseEvent>().map(|m| m.client_x() as f32)
}

// ========================================
// カルーセル
// ========================================

/// マウント済みの状態と、処理待ちのイベント
#[derive(Default)]
struct Slot {
    mounted: RefCell<Option<Mounted>>,
    pending: RefCell<EventQueue>,
}

type Shared = Rc<Slot>;
type WeakShared = Weak<Slot>;

struct Mounted {
    carousel: Carousel<DomScheduler>,
    surface: DomSurface,
    listeners: Vec<Listener>,
    /// tick とフレームのコールバック（スケジューラが参照している）
    _callbacks: [Closure<dyn FnMut()>; 2],
}

impl Mounted {
    fn dispatch(&mut self, event: CarouselEvent, shared: &WeakShared) {
        if self.reads_geometry(&event) {
            self.carousel.update_geometry(self.surface.measure());
        }
        if let Some(frame) = self.carousel.handle(event) {
            self.surface.paint(&frame, shared);
        }
    }

    /// 描画が発生するイベントだけレイアウトを読み直す
    fn reads_geometry(&self, event: &CarouselEvent) -> bool {
        match event {
            CarouselEvent::DragMove { .. }
            | CarouselEvent::DragStart { .. }
            | CarouselEvent::HoverChanged { .. }
            | CarouselEvent::FocusChanged { .. }
            | CarouselEvent::VisibilityChanged { .. } => false,
            CarouselEvent::DragEnd | CarouselEvent::PointerLeftTrack => self.carousel.is_dragging(),
            _ => true,
        }
    }
}

/// イベントをエンジンへ渡す
///
/// 処理中に発生したイベント（インジケータ再構築中の focusout など）は
/// キューに積まれ、外側の呼び出しが順に処理する。
fn dispatch(shared: &WeakShared, event: CarouselEvent) {
    let Some(slot) = shared.upgrade() else {
        return;
    };
    slot.pending.borrow_mut().push(event);
    let Ok(mut guard) = slot.mounted.try_borrow_mut() else {
        return;
    };
    let Some(mounted) = guard.as_mut() else {
        slot.pending.borrow_mut().drain();
        return;
    };
    loop {
        let next = slot.pending.borrow_mut().pop();
        let Some(event) = next else {
            break;
        };
        mounted.dispatch(event, shared);
    }
}

fn on(
    target: &EventTarget,
    kind: &'static str,
    shared: &WeakShared,
    map: impl Fn(&Event) -> Option<CarouselEvent> + 'static,
) -> Listener {
    let weak = shared.clone();
    Listener::attach(target, kind, move |e: Event| {
        if let Some(event) = map(&e) {
            dispatch(&weak, event);
        }
    })
}

/// 描画先の要素群
struct DomSurface {
    window: Window,
    document: Document,
    track: HtmlElement,
    cards: Vec<HtmlElement>,
    container: HtmlElement,
    prev: Option<HtmlElement>,
    next: Option<HtmlElement>,
    indicator_root: Option<HtmlElement>,
    indicators: Vec<HtmlElement>,
    indicator_listeners: Vec<Listener>,
}

impl DomSurface {
    fn measure(&self) -> TrackGeometry {
        let card_width = self
            .cards
            .first()
            .map(|card| card.offset_width() as f32)
            .unwrap_or(0.0);
        let container_width = self.container.get_bounding_client_rect().width() as f32;
        TrackGeometry::new(card_width, self.gap_px(), container_width)
    }

    fn gap_px(&self) -> f32 {
        let Ok(Some(style)) = self.window.get_computed_style(&self.track) else {
            return 0.0;
        };
        let column_gap = style.get_property_value("column-gap").unwrap_or_default();
        if column_gap.is_empty() || column_gap == "normal" {
            return markup::parse_px(&style.get_property_value("gap").unwrap_or_default());
        }
        markup::parse_px(&column_gap)
    }

    fn paint(&mut self, frame: &TrackFrame, shared: &WeakShared) {
        let style = self.track.style();
        let _ = style.set_property("transition", &markup::transition_value(&frame.transition));
        let _ = style.set_property("transform", &markup::transform_value(frame.translate_x));

        for (i, card) in self.cards.iter().enumerate() {
            let _ = card
                .class_list()
                .toggle_with_force(markup::ACTIVE_CLASS, i == frame.active_card);
        }

        // インジケータは数が変わった時だけ作り直す
        if self.indicators.len() != frame.indicators.count {
            self.rebuild_indicators(frame.indicators.count, shared);
        }
        for (i, indicator) in self.indicators.iter().enumerate() {
            indicator.set_class_name(&markup::indicator_class(i == frame.indicators.active));
        }

        let visibility = markup::visibility_value(frame.controls_visible);
        for button in [&self.prev, &self.next].into_iter().flatten() {
            let _ = button.style().set_property("visibility", visibility);
        }
    }

    fn rebuild_indicators(&mut self, count: usize, shared: &WeakShared) {
        for listener in self.indicator_listeners.drain(..) {
            listener.detach();
        }
        self.indicators.clear();
        let Some(root) = &self.indicator_root else {
            return;
        };
        root.set_inner_html("");

        for i in 0..count {
            let Some(el) = self
                .document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            el.set_class_name(&markup::indicator_class(false));
            el.set_tab_index(0);
            let _ = el.set_attribute("role", "button");
            let _ = el.set_attribute("aria-label", &markup::indicator_label(i));

            self.indicator_listeners.push(on(el.as_ref(), "click", shared, move |_| {
                Some(CarouselEvent::IndicatorActivated { index: i })
            }));
            self.indicator_listeners.push(on(el.as_ref(), "keydown", shared, move |e| {
                let key = e.dyn_ref::<KeyboardEvent>()?.key();
                if !is_activation_key(&key) {
                    return None;
                }
                e.prevent_default();
                Some(CarouselEvent::IndicatorActivated { index: i })
            }));

            let _ = root.append_child(&el);
            self.indicators.push(el);
        }
        log::debug!("rebuilt {} indicators", count);
    }

    fn attach_listeners(&self, shared: &WeakShared) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let track: &EventTarget = self.track.as_ref();
        let container: &EventTarget = self.container.as_ref();
        let window: &EventTarget = self.window.as_ref();

        if let Some(prev) = &self.prev {
            listeners.push(on(prev.as_ref(), "click", shared, |_| {
                Some(CarouselEvent::PreviousPressed)
            }));
        }
        if let Some(next) = &self.next {
            listeners.push(on(next.as_ref(), "click", shared, |_| {
                Some(CarouselEvent::NextPressed)
            }));
        }

        // タッチ
        listeners.push(on(track, "touchstart", shared, |e| {
            touch_x(e).map(|x| CarouselEvent::DragStart { x })
        }));
        listeners.push(on(track, "touchmove", shared, |e| {
            touch_x(e).map(|x| CarouselEvent::DragMove { x })
        }));
        listeners.push(on(track, "touchend", shared, |_| Some(CarouselEvent::DragEnd)));

        // マウス（移動と離した判定はウィンドウ全体で拾う）
        listeners.push(on(track, "mousedown", shared, |e| {
            e.prevent_default();
            mouse_x(e).map(|x| CarouselEvent::DragStart { x })
        }));
        listeners.push(on(window, "mousemove", shared, |e| {
            mouse_x(e).map(|x| CarouselEvent::DragMove { x })
        }));
        listeners.push(on(window, "mouseup", shared, |_| Some(CarouselEvent::DragEnd)));
        listeners.push(on(track, "mouseleave", shared, |_| {
            Some(CarouselEvent::PointerLeftTrack)
        }));

        listeners.push(on(container, "keydown", shared, |e| {
            let key = NavKey::from_dom_key(&e.dyn_ref::<KeyboardEvent>()?.key())?;
            Some(CarouselEvent::KeyPressed { key })
        }));
        listeners.push(on(container, "mouseenter", shared, |_| {
            Some(CarouselEvent::HoverChanged { inside: true })
        }));
        listeners.push(on(container, "mouseleave", shared, |_| {
            Some(CarouselEvent::HoverChanged { inside: false })
        }));
        listeners.push(on(container, "focusin", shared, |_| {
            Some(CarouselEvent::FocusChanged { inside: true })
        }));
        listeners.push(on(container, "focusout", shared, |_| {
            Some(CarouselEvent::FocusChanged { inside: false })
        }));

        let win = self.window.clone();
        listeners.push(on(window, "resize", shared, move |_| {
            Some(CarouselEvent::Resized {
                viewport_width: viewport_width(&win),
            })
        }));
        let doc = self.document.clone();
        listeners.push(on(self.document.as_ref(), "visibilitychange", shared, move |_| {
            Some(CarouselEvent::VisibilityChanged {
                visible: !doc.hidden(),
            })
        }));

        listeners
    }
}

/// ページ上のカルーセル1つ分
pub struct DomCarousel {
    shared: Shared,
}

impl DomCarousel {
    /// 必要な要素が揃っていなければ何もせず None
    pub fn mount(window: &Window, document: &Document, site: &SiteConfig) -> Option<Self> {
        let track = html_by_id(document, markup::TRACK_ID)?;
        let cards = collect_html(&track, &format!(".{}", markup::CARD_CLASS));
        if cards.is_empty() {
            log::debug!("#{} has no cards, skipping", markup::TRACK_ID);
            return None;
        }
        let wrapper = track
            .closest(&format!(".{}", markup::WRAPPER_CLASS))
            .ok()
            .flatten()?;
        let container = query_html(&wrapper, &format!(".{}", markup::CONTAINER_CLASS))?;
        let config = read_carousel_config(&track, &site.carousel);

        let shared: Shared = Rc::new(Slot::default());
        let weak = Rc::downgrade(&shared);

        let tick_ref = weak.clone();
        let on_tick = Closure::wrap(Box::new(move || {
            dispatch(&tick_ref, CarouselEvent::AutoAdvanceTick);
        }) as Box<dyn FnMut()>);
        let frame_ref = weak.clone();
        let on_frame = Closure::wrap(Box::new(move || {
            dispatch(&frame_ref, CarouselEvent::AnimationFrame);
        }) as Box<dyn FnMut()>);
        let scheduler = DomScheduler::new(window.clone(), &on_tick, Some(&on_frame));

        let mut surface = DomSurface {
            window: window.clone(),
            document: document.clone(),
            track,
            cards,
            container,
            prev: html_by_id(document, markup::PREV_BUTTON_ID),
            next: html_by_id(document, markup::NEXT_BUTTON_ID),
            indicator_root: html_by_id(document, markup::INDICATORS_ID),
            indicators: Vec::new(),
            indicator_listeners: Vec::new(),
        };

        let mut carousel = Carousel::new(
            config,
            surface.cards.len(),
            viewport_width(window),
            surface.measure(),
            scheduler,
        )?;

        surface.container.set_tab_index(0);
        let listeners = surface.attach_listeners(&weak);
        let first = carousel.init();
        surface.paint(&first, &weak);

        *shared.mounted.borrow_mut() = Some(Mounted {
            carousel,
            surface,
            listeners,
            _callbacks: [on_tick, on_frame],
        });
        log::info!("carousel mounted on #{}", markup::TRACK_ID);
        Some(Self { shared })
    }

    pub fn current_index(&self) -> Option<usize> {
        let guard = self.shared.mounted.try_borrow().ok()?;
        guard.as_ref().map(|m| m.carousel.current_index())
    }

    /// タイマーを止め、全リスナーを外す
    pub fn destroy(&self) {
        let Ok(mut guard) = self.shared.mounted.try_borrow_mut() else {
            log::warn!("carousel busy, destroy skipped");
            return;
        };
        if let Some(mut mounted) = guard.take() {
            mounted.carousel.destroy();
            for listener in mounted.listeners.iter().chain(&mounted.surface.indicator_listeners) {
                listener.detach();
            }
        }
    }
}
