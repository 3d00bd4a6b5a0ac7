// src/engine/mod.rs
// カルーセルエンジン - ページング・寸法・ドラッグ・自動送りを分割したモジュール群

pub mod auto_advance;
pub mod carousel;
pub mod drag;
pub mod frame;
pub mod geometry;
pub mod paging;
pub mod scheduler;

// 公開API
pub use auto_advance::{AutoAdvance, SuspendReason};
pub use carousel::Carousel;
pub use drag::{DragPhase, DragTracker, SettleDecision};
pub use frame::{IndicatorState, TrackFrame, Transition};
pub use geometry::{TrackGeometry, TranslateBounds};
pub use scheduler::{FrameHandle, Fired, ManualScheduler, Scheduler, TimerHandle};
