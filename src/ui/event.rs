use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// カルーセルに届く入力イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CarouselEvent {
    PreviousPressed,
    NextPressed,
    IndicatorActivated { index: usize },

    // タッチ / マウス
    DragStart { x: f32 },
    DragMove { x: f32 },
    DragEnd,
    PointerLeftTrack,

    // スケジューラからのコールバック
    AnimationFrame,
    AutoAdvanceTick,

    Resized { viewport_width: f32 },
    VisibilityChanged { visible: bool },
    HoverChanged { inside: bool },
    FocusChanged { inside: bool },
    KeyPressed { key: NavKey },
}

/// コンテナにフォーカスがある時の矢印キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    Left,
    Right,
}

impl NavKey {
    /// KeyboardEvent.key の値から変換
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(NavKey::Left),
            "ArrowRight" => Some(NavKey::Right),
            _ => None,
        }
    }
}

/// インジケータを押したことになるキー
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

pub struct EventQueue {
    pub queue: VecDeque<CarouselEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }
    pub fn push(&mut self, event: CarouselEvent) {
        self.queue.push_back(event);
    }
    pub fn pop(&mut self) -> Option<CarouselEvent> {
        self.queue.pop_front()
    }
    pub fn drain(&mut self) -> Vec<CarouselEvent> {
        self.queue.drain(..).collect()
    }
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_key_mapping() {
        assert_eq!(NavKey::from_dom_key("ArrowLeft"), Some(NavKey::Left));
        assert_eq!(NavKey::from_dom_key("ArrowRight"), Some(NavKey::Right));
        assert_eq!(NavKey::from_dom_key("ArrowUp"), None);
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }

    #[test]
    fn test_event_json_shape() {
        let ev: CarouselEvent = serde_json::from_str(r#"{"type": "drag_start", "x": 120.5}"#).unwrap();
        assert_eq!(ev, CarouselEvent::DragStart { x: 120.5 });
        let ev: CarouselEvent =
            serde_json::from_str(r#"{"type": "key_pressed", "key": "right"}"#).unwrap();
        assert_eq!(ev, CarouselEvent::KeyPressed { key: NavKey::Right });
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut q = EventQueue::new();
        q.push(CarouselEvent::NextPressed);
        q.push(CarouselEvent::DragEnd);
        assert_eq!(q.pop(), Some(CarouselEvent::NextPressed));
        assert_eq!(q.drain(), vec![CarouselEvent::DragEnd]);
        assert!(q.is_empty());
    }
}
