// 繰り返しタイマーとフレームコールバックの抽象化
//
// ブラウザでは setInterval / requestAnimationFrame、
// テストとシミュレータでは仮想時計の ManualScheduler を使う。

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub i32);

/// ウィジェットが予約できる処理
///
/// 発火時にどのコールバックを呼ぶかは実装側が知っている
/// （ウィジェットごとにインターバル1種類・フレーム1種類だけ）。
pub trait Scheduler {
    fn start_interval(&mut self, interval_ms: u32) -> TimerHandle;
    fn cancel_interval(&mut self, handle: TimerHandle);
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// ManualScheduler から取り出した発火イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Interval { handle: TimerHandle, at_ms: u64 },
    Frame { handle: FrameHandle, at_ms: u64 },
}

#[derive(Debug, Clone)]
struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

/// 仮想時計で動くスケジューラ
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now_ms: u64,
    frame_interval_ms: u64,
    next_id: i32,
    intervals: BTreeMap<TimerHandle, Interval>,
    frames: BTreeMap<FrameHandle, u64>,
    pub intervals_started: usize,
    pub intervals_cancelled: usize,
    pub frames_requested: usize,
    pub frames_cancelled: usize,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(16)
    }

    pub fn with_frame_interval(frame_interval_ms: u64) -> Self {
        Self {
            now_ms: 0,
            // 0 だとフレームが同じ時刻に積まれ続ける
            frame_interval_ms: frame_interval_ms.max(1),
            next_id: 1,
            intervals: BTreeMap::new(),
            frames: BTreeMap::new(),
            intervals_started: 0,
            intervals_cancelled: 0,
            frames_requested: 0,
            frames_cancelled: 0,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn live_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn live_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_interval_live(&self, handle: TimerHandle) -> bool {
        self.intervals.contains_key(&handle)
    }

    fn alloc_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// until_ms までに期限が来た最も早い処理を1つ取り出す
    ///
    /// インターバルは次の期限に再登録され、フレームは一度きり。
    /// 何もなければ時計を until_ms まで進めて None を返す。
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let interval = self
            .intervals
            .iter()
            .map(|(h, i)| (i.next_due_ms, *h))
            .min();
        let frame = self.frames.iter().map(|(h, due)| (*due, *h)).min();

        let fired = match (interval, frame) {
            (Some((i_due, ih)), Some((f_due, fh))) => {
                // 同時刻ならフレームを先に処理する
                if f_due <= i_due {
                    Some(Fired::Frame { handle: fh, at_ms: f_due })
                } else {
                    Some(Fired::Interval { handle: ih, at_ms: i_due })
                }
            }
            (Some((due, h)), None) => Some(Fired::Interval { handle: h, at_ms: due }),
            (None, Some((due, h))) => Some(Fired::Frame { handle: h, at_ms: due }),
            (None, None) => None,
        };

        match fired {
            Some(Fired::Interval { handle, at_ms }) if at_ms <= until_ms => {
                if let Some(interval) = self.intervals.get_mut(&handle) {
                    interval.next_due_ms += interval.period_ms;
                }
                self.now_ms = self.now_ms.max(at_ms);
                fired
            }
            Some(Fired::Frame { handle, at_ms }) if at_ms <= until_ms => {
                self.frames.remove(&handle);
                self.now_ms = self.now_ms.max(at_ms);
                fired
            }
            _ => {
                self.now_ms = self.now_ms.max(until_ms);
                None
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn start_interval(&mut self, interval_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.alloc_id());
        let period_ms = u64::from(interval_ms.max(1));
        self.intervals.insert(
            handle,
            Interval {
                period_ms,
                next_due_ms: self.now_ms + period_ms,
            },
        );
        self.intervals_started += 1;
        handle
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        if self.intervals.remove(&handle).is_some() {
            self.intervals_cancelled += 1;
        }
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.alloc_id());
        self.frames.insert(handle, self.now_ms + self.frame_interval_ms);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frames.remove(&handle).is_some() {
            self.frames_cancelled += 1;
        }
    }
}
