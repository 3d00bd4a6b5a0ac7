pub mod event;

pub use event::{CarouselEvent, EventQueue, NavKey, is_activation_key};
