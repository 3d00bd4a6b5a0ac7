// 自動送りタイマーのライフサイクル
// 生きているタイマーは常に高々1つ

use super::scheduler::{Scheduler, TimerHandle};

/// 自動送りを止めている理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendReason {
    Hover,
    Focus,
    Hidden,
    Drag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Suspensions {
    hover: bool,
    focus: bool,
    hidden: bool,
    drag: bool,
}

impl Suspensions {
    fn slot(&mut self, reason: SuspendReason) -> &mut bool {
        match reason {
            SuspendReason::Hover => &mut self.hover,
            SuspendReason::Focus => &mut self.focus,
            SuspendReason::Hidden => &mut self.hidden,
            SuspendReason::Drag => &mut self.drag,
        }
    }

    fn any(&self) -> bool {
        self.hover || self.focus || self.hidden || self.drag
    }
}

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    interval_ms: u32,
    handle: Option<TimerHandle>,
    suspended: Suspensions,
}

impl AutoAdvance {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            handle: None,
            suspended: Suspensions::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.any()
    }

    pub fn is_suspended_by(&self, reason: SuspendReason) -> bool {
        let mut s = self.suspended;
        *s.slot(reason)
    }

    /// タイマーを開始する。既に動いている・停止理由がある・
    /// ページに収まっている場合は何もしない
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S, has_overflow: bool) {
        if self.handle.is_some() || !has_overflow || self.suspended.any() {
            return;
        }
        let handle = scheduler.start_interval(self.interval_ms);
        log::debug!("auto-advance started ({:?}, every {}ms)", handle, self.interval_ms);
        self.handle = Some(handle);
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel_interval(handle);
            log::debug!("auto-advance stopped ({:?})", handle);
        }
    }

    /// 手動操作の後は保留中の tick と競合しないよう作り直す
    pub fn reset<S: Scheduler>(&mut self, scheduler: &mut S, has_overflow: bool) {
        self.stop(scheduler);
        self.start(scheduler, has_overflow);
    }

    pub fn suspend<S: Scheduler>(&mut self, scheduler: &mut S, reason: SuspendReason) {
        *self.suspended.slot(reason) = true;
        self.stop(scheduler);
    }

    /// 停止理由を外す。他の理由が残っていなければ再開する
    pub fn resume<S: Scheduler>(&mut self, scheduler: &mut S, reason: SuspendReason, has_overflow: bool) {
        *self.suspended.slot(reason) = false;
        self.start(scheduler, has_overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scheduler::ManualScheduler;

    #[test]
    fn test_never_starts_without_overflow() {
        let mut s = ManualScheduler::new();
        let mut auto = AutoAdvance::new(4000);
        auto.start(&mut s, false);
        auto.reset(&mut s, false);
        assert!(!auto.is_running());
        assert_eq!(s.intervals_started, 0);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut s = ManualScheduler::new();
        let mut auto = AutoAdvance::new(4000);
        auto.start(&mut s, true);
        auto.start(&mut s, true);
        assert_eq!(s.intervals_started, 1);
        assert_eq!(s.live_intervals(), 1);
        auto.stop(&mut s);
        auto.stop(&mut s);
        assert_eq!(s.intervals_cancelled, 1);
        assert_eq!(s.live_intervals(), 0);
    }

    #[test]
    fn test_reset_keeps_single_timer() {
        let mut s = ManualScheduler::new();
        let mut auto = AutoAdvance::new(4000);
        auto.start(&mut s, true);
        for _ in 0..5 {
            auto.reset(&mut s, true);
        }
        assert_eq!(s.live_intervals(), 1);
        assert_eq!(s.intervals_started, 6);
    }

    #[test]
    fn test_resume_waits_for_all_reasons() {
        let mut s = ManualScheduler::new();
        let mut auto = AutoAdvance::new(4000);
        auto.start(&mut s, true);
        auto.suspend(&mut s, SuspendReason::Hover);
        auto.suspend(&mut s, SuspendReason::Hidden);
        assert!(!auto.is_running());

        auto.resume(&mut s, SuspendReason::Hover, true);
        assert!(!auto.is_running());
        assert!(auto.is_suspended_by(SuspendReason::Hidden));

        auto.resume(&mut s, SuspendReason::Hidden, true);
        assert!(auto.is_running());
        assert_eq!(s.live_intervals(), 1);
    }
}
