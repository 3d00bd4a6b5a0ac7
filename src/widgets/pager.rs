// テスティモニアル用のページ送り
// カードではなくページ単位でスクロールする簡易カルーセル

use crate::config::PagerConfig;
use crate::engine::scheduler::{Scheduler, TimerHandle};
use serde::Serialize;

/// トラックに適用するスクロール位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PagerScroll {
    pub page: usize,
    pub left_px: f32,
}

pub struct TestimonialPager<S: Scheduler> {
    config: PagerConfig,
    slide_count: usize,
    slides_per_view: usize,
    current_page: usize,
    timer: Option<TimerHandle>,
    scheduler: S,
}

impl<S: Scheduler> TestimonialPager<S> {
    pub fn new(config: PagerConfig, slide_count: usize, viewport_width: f32, scheduler: S) -> Self {
        let slides_per_view = slides_per_view_for(&config, viewport_width);
        Self {
            config,
            slide_count,
            slides_per_view,
            current_page: 0,
            timer: None,
            scheduler,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn slides_per_view(&self) -> usize {
        self.slides_per_view
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn total_pages(&self) -> usize {
        self.slide_count.div_ceil(self.slides_per_view).max(1)
    }

    /// 既に動いていれば何もしない
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        self.timer = Some(self.scheduler.start_interval(self.config.auto_advance_interval_ms));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel_interval(handle);
        }
    }

    fn scroll(&self, page_width: f32) -> PagerScroll {
        PagerScroll {
            page: self.current_page,
            left_px: self.current_page as f32 * page_width,
        }
    }

    /// 自動送り。page_width は表示領域の幅
    pub fn tick(&mut self, page_width: f32) -> PagerScroll {
        self.current_page = (self.current_page + 1) % self.total_pages();
        self.scroll(page_width)
    }

    /// 表示枚数が変わった時だけ先頭ページへ戻す
    pub fn resize(&mut self, viewport_width: f32, page_width: f32) -> Option<PagerScroll> {
        let next = slides_per_view_for(&self.config, viewport_width);
        if next == self.slides_per_view {
            return None;
        }
        self.slides_per_view = next;
        self.current_page = 0;
        log::debug!("testimonial pager: {} per view, back to page 0", next);
        Some(self.scroll(page_width))
    }

    /// スライドをクリックすると一時停止
    pub fn slide_clicked(&mut self) {
        self.stop();
    }

    /// スライドからマウスが離れたら再開
    pub fn slide_left(&mut self) {
        self.start();
    }

    pub fn destroy(&mut self) {
        self.stop();
    }
}

pub fn slides_per_view_for(config: &PagerConfig, viewport_width: f32) -> usize {
    if viewport_width >= config.wide_min_width {
        config.wide_slides
    } else {
        config.narrow_slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scheduler::ManualScheduler;

    fn pager(slides: usize, width: f32) -> TestimonialPager<ManualScheduler> {
        TestimonialPager::new(PagerConfig::default(), slides, width, ManualScheduler::new())
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(pager(7, 1280.0).total_pages(), 3);
        assert_eq!(pager(7, 600.0).total_pages(), 7);
        assert_eq!(pager(0, 600.0).total_pages(), 1);
    }

    #[test]
    fn test_tick_wraps_pages() {
        let mut p = pager(6, 1280.0);
        assert_eq!(p.tick(1200.0), PagerScroll { page: 1, left_px: 1200.0 });
        assert_eq!(p.tick(1200.0).page, 0);
    }

    #[test]
    fn test_resize_resets_only_on_change() {
        let mut p = pager(6, 1280.0);
        p.tick(1200.0);
        assert_eq!(p.resize(1300.0, 1200.0), None);
        assert_eq!(p.current_page(), 1);
        let scroll = p.resize(800.0, 760.0).unwrap();
        assert_eq!(scroll, PagerScroll { page: 0, left_px: 0.0 });
        assert_eq!(p.slides_per_view(), 1);
    }

    #[test]
    fn test_click_pauses_and_leave_resumes() {
        let mut p = pager(6, 1280.0);
        p.start();
        p.start();
        assert_eq!(p.scheduler().intervals_started, 1);
        p.slide_clicked();
        assert!(!p.is_running());
        p.slide_left();
        p.slide_left();
        assert!(p.is_running());
        assert_eq!(p.scheduler().live_intervals(), 1);
        p.destroy();
        assert_eq!(p.scheduler().live_intervals(), 0);
    }
}
