// ドラッグ（タッチ / マウス）の状態機械
// Idle → Dragging → Idle

use super::geometry::TranslateBounds;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging { start_x: f32 },
}

/// ドラッグ終了時の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleDecision {
    Forward,
    Backward,
    SnapBack,
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    phase: DragPhase,
    /// 描画中の translate
    current_translate: f32,
    /// 最後に確定した translate
    committed_translate: f32,
    last_delta: f32,
    dead_zone: f32,
}

impl DragTracker {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            phase: DragPhase::Idle,
            current_translate: 0.0,
            committed_translate: 0.0,
            last_delta: 0.0,
            dead_zone,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn current_translate(&self) -> f32 {
        self.current_translate
    }

    pub fn committed_translate(&self) -> f32 {
        self.committed_translate
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    /// render の結果を確定値として記録する
    pub fn commit(&mut self, translate: f32) {
        self.committed_translate = translate;
        self.current_translate = translate;
    }

    pub fn begin(&mut self, x: f32) {
        self.phase = DragPhase::Dragging { start_x: x };
        self.last_delta = 0.0;
    }

    /// ポインタ移動。デッドゾーンを超えた時だけ translate を更新する
    pub fn update(&mut self, x: f32) -> bool {
        let DragPhase::Dragging { start_x } = self.phase else {
            return false;
        };
        let delta = x - start_x;
        self.last_delta = delta;
        if delta.abs() > self.dead_zone {
            self.current_translate = self.committed_translate + delta;
            return true;
        }
        false
    }

    /// 1枚表示ではフレームごとに範囲内へ収める
    pub fn bound(&mut self, bounds: TranslateBounds) {
        self.current_translate = bounds.clamp(self.current_translate);
    }

    pub fn moved_by(&self) -> f32 {
        self.current_translate - self.committed_translate
    }

    /// ドラッグを終了して送り方向を決める。Idle なら None
    ///
    /// しきい値ちょうどでは動かさない（厳密な不等号）。
    pub fn release(&mut self, threshold: f32, at_first: bool, at_last: bool) -> Option<SettleDecision> {
        if !self.is_dragging() {
            return None;
        }
        self.phase = DragPhase::Idle;
        let moved_by = self.moved_by();
        let decision = if moved_by < -threshold && !at_last {
            SettleDecision::Forward
        } else if moved_by > threshold && !at_first {
            SettleDecision::Backward
        } else {
            SettleDecision::SnapBack
        };
        Some(decision)
    }

    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
        self.current_translate = self.committed_translate;
        self.last_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_ignores_micro_drags() {
        let mut drag = DragTracker::new(10.0);
        drag.commit(-400.0);
        drag.begin(200.0);
        assert!(!drag.update(208.0));
        assert_eq!(drag.current_translate(), -400.0);
        assert_eq!(drag.last_delta(), 8.0);
        assert!(!drag.update(210.0));
        assert!(drag.update(189.0));
        assert_eq!(drag.current_translate(), -411.0);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut drag = DragTracker::new(10.0);
        assert!(!drag.update(500.0));
        assert_eq!(drag.current_translate(), 0.0);
    }

    #[test]
    fn test_release_threshold_is_strict() {
        let mut drag = DragTracker::new(10.0);
        drag.commit(-400.0);
        drag.begin(300.0);
        drag.update(250.0);
        assert_eq!(drag.release(50.0, false, false), Some(SettleDecision::SnapBack));

        drag.commit(-400.0);
        drag.begin(300.0);
        drag.update(249.0);
        assert_eq!(drag.release(50.0, false, false), Some(SettleDecision::Forward));

        drag.commit(-400.0);
        drag.begin(300.0);
        drag.update(351.0);
        assert_eq!(drag.release(50.0, false, false), Some(SettleDecision::Backward));
    }

    #[test]
    fn test_release_does_not_pass_the_ends() {
        let mut drag = DragTracker::new(10.0);
        drag.begin(300.0);
        drag.update(100.0);
        assert_eq!(drag.release(50.0, false, true), Some(SettleDecision::SnapBack));

        drag.begin(300.0);
        drag.update(500.0);
        assert_eq!(drag.release(50.0, true, false), Some(SettleDecision::SnapBack));
    }

    #[test]
    fn test_release_twice() {
        let mut drag = DragTracker::new(10.0);
        drag.begin(0.0);
        assert!(drag.release(50.0, true, false).is_some());
        assert_eq!(drag.release(50.0, true, false), None);
    }

    #[test]
    fn test_bound_clamps_live_translate() {
        let mut drag = DragTracker::new(10.0);
        drag.commit(32.0);
        drag.begin(0.0);
        drag.update(200.0);
        drag.bound(TranslateBounds { min: -600.0, max: 32.0 });
        assert_eq!(drag.current_translate(), 32.0);
    }
}
