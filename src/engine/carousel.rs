// カルーセルエンジン本体
//
// DOM には依存しない。寸法を受け取り TrackFrame を返すだけで、
// 実際の描画はアダプタ（dom_renderer）が行う。
// 状態はすべてインスタンスが所有し、ウィジェットごとに独立している。

use super::auto_advance::{AutoAdvance, SuspendReason};
use super::drag::{DragTracker, SettleDecision};
use super::frame::{IndicatorState, TrackFrame, Transition};
use super::geometry::TrackGeometry;
use super::paging;
use super::scheduler::{FrameHandle, Fired, ManualScheduler, Scheduler};
use crate::config::CarouselConfig;
use crate::ui::event::{CarouselEvent, NavKey};

pub struct Carousel<S: Scheduler> {
    config: CarouselConfig,
    card_count: usize,
    cards_per_view: usize,
    current_index: usize,
    geometry: TrackGeometry,
    drag: DragTracker,
    auto: AutoAdvance,
    /// ドラッグ中だけ存在するフレーム要求
    frame_request: Option<FrameHandle>,
    scheduler: S,
    destroyed: bool,
}

impl<S: Scheduler> Carousel<S> {
    /// カードが1枚もなければ作らない
    pub fn new(
        config: CarouselConfig,
        card_count: usize,
        viewport_width: f32,
        geometry: TrackGeometry,
        scheduler: S,
    ) -> Option<Self> {
        if card_count == 0 {
            log::debug!("carousel skipped: no cards");
            return None;
        }
        let cards_per_view = config.cards_per_view_for(viewport_width);
        let drag = DragTracker::new(config.drag_dead_zone_px);
        let auto = AutoAdvance::new(config.auto_advance_interval_ms);
        Some(Self {
            config,
            card_count,
            cards_per_view,
            current_index: 0,
            geometry,
            drag,
            auto,
            frame_request: None,
            scheduler,
            destroyed: false,
        })
    }

    /// 初回レイアウトと自動送りの開始
    pub fn init(&mut self) -> TrackFrame {
        let frame = self.render();
        let overflow = self.has_overflow();
        self.auto.start(&mut self.scheduler, overflow);
        log::info!(
            "carousel ready: {} cards, {} per view, auto-advance {}",
            self.card_count,
            self.cards_per_view,
            if self.auto.is_running() { "on" } else { "off" }
        );
        frame
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn cards_per_view(&self) -> usize {
        self.cards_per_view
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn max_index(&self) -> usize {
        paging::max_index(self.card_count, self.cards_per_view)
    }

    pub fn geometry(&self) -> TrackGeometry {
        self.geometry
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto.is_running()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn committed_translate(&self) -> f32 {
        self.drag.committed_translate()
    }

    pub fn current_translate(&self) -> f32 {
        self.drag.current_translate()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn has_overflow(&self) -> bool {
        paging::has_overflow(self.card_count, self.cards_per_view)
    }

    fn settled_transition(&self) -> Transition {
        if self.drag.is_dragging() {
            Transition::Immediate
        } else {
            Transition::Animated {
                duration_ms: self.config.transition_duration_ms,
                easing: self.config.transition_easing.clone(),
            }
        }
    }

    fn frame_at(&self, translate_x: f32, transition: Transition) -> TrackFrame {
        TrackFrame {
            translate_x,
            active_card: self.current_index,
            indicators: IndicatorState {
                count: paging::indicator_count(self.card_count, self.cards_per_view),
                active: self.current_index,
            },
            controls_visible: self.has_overflow(),
            transition,
        }
    }

    /// ホスト側の寸法が変わった時に呼ぶ（カード幅・gap・コンテナ幅）
    pub fn update_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }

    /// 現在の index から translate を計算し直して確定させる
    pub fn render(&mut self) -> TrackFrame {
        self.current_index =
            paging::clamp_index(self.current_index as isize, self.card_count, self.cards_per_view);
        let translate = self
            .geometry
            .translate_for_index(self.current_index, self.card_count, self.cards_per_view);
        self.drag.commit(translate);
        self.frame_at(translate, self.settled_transition())
    }

    fn navigate(&mut self, index: usize) -> Option<TrackFrame> {
        if self.destroyed {
            return None;
        }
        self.current_index = index;
        let frame = self.render();
        let overflow = self.has_overflow();
        self.auto.reset(&mut self.scheduler, overflow);
        log::debug!("carousel moved to {}/{}", self.current_index, self.max_index());
        Some(frame)
    }

    pub fn go_to_next(&mut self) -> Option<TrackFrame> {
        let next = paging::next_index(self.current_index, self.card_count, self.cards_per_view);
        self.navigate(next)
    }

    pub fn go_to_previous(&mut self) -> Option<TrackFrame> {
        let prev = paging::previous_index(self.current_index, self.card_count, self.cards_per_view);
        self.navigate(prev)
    }

    /// 直接ジャンプ。範囲外は折り返さず端に寄せる
    pub fn go_to(&mut self, index: isize) -> Option<TrackFrame> {
        let clamped = paging::clamp_index(index, self.card_count, self.cards_per_view);
        self.navigate(clamped)
    }

    pub fn drag_start(&mut self, x: f32) -> Option<TrackFrame> {
        if self.destroyed {
            return None;
        }
        if let Some(handle) = self.frame_request.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.auto.suspend(&mut self.scheduler, SuspendReason::Drag);
        self.drag.begin(x);
        self.frame_request = Some(self.scheduler.request_frame());
        log::trace!("drag start at {}", x);
        Some(self.frame_at(self.drag.current_translate(), Transition::Immediate))
    }

    /// 移動は記録だけして、描画は次のフレームで行う
    pub fn drag_move(&mut self, x: f32) {
        if self.destroyed {
            return;
        }
        self.drag.update(x);
    }

    /// ドラッグ中に1回ずつ呼ばれるフレーム処理
    pub fn animation_frame(&mut self) -> Option<TrackFrame> {
        self.frame_request = None;
        if self.destroyed || !self.drag.is_dragging() {
            return None;
        }
        if self.cards_per_view == 1 {
            self.drag.bound(self.geometry.translate_bounds(self.card_count));
        }
        self.frame_request = Some(self.scheduler.request_frame());
        log::trace!("drag frame: translate {}", self.drag.current_translate());
        Some(self.frame_at(self.drag.current_translate(), Transition::Immediate))
    }

    pub fn drag_end(&mut self) -> Option<TrackFrame> {
        if self.destroyed || !self.drag.is_dragging() {
            return None;
        }
        if let Some(handle) = self.frame_request.take() {
            self.scheduler.cancel_frame(handle);
        }
        let threshold = self
            .geometry
            .commit_threshold(self.config.drag_commit_max_px, self.config.drag_commit_ratio);
        let at_first = self.current_index == 0;
        let at_last = self.current_index >= self.max_index();
        let moved_by = self.drag.moved_by();
        let decision = self.drag.release(threshold, at_first, at_last)?;
        match decision {
            SettleDecision::Forward => self.current_index += 1,
            SettleDecision::Backward => self.current_index -= 1,
            SettleDecision::SnapBack => {}
        }
        log::debug!(
            "drag settled: moved {:.1}px (threshold {:.1}) -> {:?}, index {}",
            moved_by,
            threshold,
            decision,
            self.current_index
        );
        let frame = self.render();
        let overflow = self.has_overflow();
        self.auto.resume(&mut self.scheduler, SuspendReason::Drag, overflow);
        Some(frame)
    }

    /// ドラッグ中にポインタがトラック外に出たら離したのと同じ扱い
    pub fn pointer_left_track(&mut self) -> Option<TrackFrame> {
        if self.drag.is_dragging() {
            self.drag_end()
        } else {
            None
        }
    }

    pub fn auto_advance_tick(&mut self) -> Option<TrackFrame> {
        if self.destroyed {
            return None;
        }
        self.go_to_next()
    }

    /// ビューポート幅が変わった時の再レイアウト
    pub fn resize(&mut self, viewport_width: f32) -> Option<TrackFrame> {
        if self.destroyed {
            return None;
        }
        let cards_per_view = self.config.cards_per_view_for(viewport_width);
        if cards_per_view != self.cards_per_view {
            log::debug!(
                "cards per view {} -> {} (viewport {}px)",
                self.cards_per_view,
                cards_per_view,
                viewport_width
            );
            self.cards_per_view = cards_per_view;
            self.current_index = 0;
            let frame = self.render();
            let overflow = self.has_overflow();
            self.auto.reset(&mut self.scheduler, overflow);
            Some(frame)
        } else {
            Some(self.render())
        }
    }

    fn set_suspended(&mut self, reason: SuspendReason, suspended: bool) {
        if self.destroyed {
            return;
        }
        if suspended {
            self.auto.suspend(&mut self.scheduler, reason);
        } else {
            let overflow = self.has_overflow();
            self.auto.resume(&mut self.scheduler, reason, overflow);
        }
    }

    pub fn set_hovered(&mut self, inside: bool) {
        self.set_suspended(SuspendReason::Hover, inside);
    }

    pub fn set_focused(&mut self, inside: bool) {
        self.set_suspended(SuspendReason::Focus, inside);
    }

    pub fn set_document_visible(&mut self, visible: bool) {
        self.set_suspended(SuspendReason::Hidden, !visible);
    }

    pub fn key_pressed(&mut self, key: NavKey) -> Option<TrackFrame> {
        match key {
            NavKey::Left => self.go_to_previous(),
            NavKey::Right => self.go_to_next(),
        }
    }

    /// イベントを振り分ける。描画すべきフレームがあれば返す
    pub fn handle(&mut self, event: CarouselEvent) -> Option<TrackFrame> {
        match event {
            CarouselEvent::PreviousPressed => self.go_to_previous(),
            CarouselEvent::NextPressed => self.go_to_next(),
            CarouselEvent::IndicatorActivated { index } => {
                self.go_to(isize::try_from(index).unwrap_or(isize::MAX))
            }
            CarouselEvent::DragStart { x } => self.drag_start(x),
            CarouselEvent::DragMove { x } => {
                self.drag_move(x);
                None
            }
            CarouselEvent::DragEnd => self.drag_end(),
            CarouselEvent::PointerLeftTrack => self.pointer_left_track(),
            CarouselEvent::AnimationFrame => self.animation_frame(),
            CarouselEvent::AutoAdvanceTick => self.auto_advance_tick(),
            CarouselEvent::Resized { viewport_width } => self.resize(viewport_width),
            CarouselEvent::VisibilityChanged { visible } => {
                self.set_document_visible(visible);
                None
            }
            CarouselEvent::HoverChanged { inside } => {
                self.set_hovered(inside);
                None
            }
            CarouselEvent::FocusChanged { inside } => {
                self.set_focused(inside);
                None
            }
            CarouselEvent::KeyPressed { key } => self.key_pressed(key),
        }
    }

    /// タイマーとフレーム要求をすべて解除する。以後の操作は何もしない
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.auto.stop(&mut self.scheduler);
        if let Some(handle) = self.frame_request.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.drag.cancel();
        self.destroyed = true;
        log::info!("carousel destroyed");
    }
}

impl Carousel<ManualScheduler> {
    /// 仮想時計を進め、期限の来たタイマーとフレームを順に処理する
    ///
    /// 描画が発生したものだけを (時刻, 発火したイベント, フレーム) で返す。
    pub fn advance_to(&mut self, until_ms: u64) -> Vec<(u64, CarouselEvent, TrackFrame)> {
        let mut frames = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(until_ms) {
            let (at_ms, event) = match fired {
                Fired::Interval { at_ms, .. } => (at_ms, CarouselEvent::AutoAdvanceTick),
                Fired::Frame { at_ms, .. } => (at_ms, CarouselEvent::AnimationFrame),
            };
            if let Some(frame) = self.handle(event.clone()) {
                frames.push((at_ms, event, frame));
            }
        }
        frames
    }
}
