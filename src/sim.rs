// ヘッドレスのシミュレータ
//
// JSON のイベント台本を仮想時計の上で再生し、カルーセルが出力した
// フレームを時刻と原因つきで記録する。CLI と結合テストの両方から使う。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CarouselConfig;
use crate::engine::{Carousel, ManualScheduler, TrackFrame, TrackGeometry};
use crate::error::ConfigError;
use crate::ui::event::CarouselEvent;

/// 台本の1行
#[derive(Debug, Clone, Deserialize)]
pub struct SimStep {
    pub at_ms: u64,
    pub event: CarouselEvent,
    /// イベントの前に寸法を差し替える（リサイズ時など）
    #[serde(default)]
    pub geometry: Option<TrackGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimScript {
    pub viewport_width: f32,
    pub card_count: usize,
    pub geometry: TrackGeometry,
    #[serde(default)]
    pub steps: Vec<SimStep>,
    /// 最後のステップ以降もこの時刻まで時計を進める
    #[serde(default)]
    pub run_until_ms: u64,
}

impl SimScript {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let script: Self = serde_json::from_str(source)?;
        if script.card_count == 0 {
            return Err(ConfigError::invalid("script needs at least one card"));
        }
        Ok(script)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded script from {}", path.as_ref().display());
        Self::from_json_str(&source)
    }
}

/// フレームが出た理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    Init,
    Input,
    Timer,
    Frame,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimRecord {
    pub at_ms: u64,
    pub cause: Cause,
    pub frame: TrackFrame,
}

struct Simulation {
    carousel: Carousel<ManualScheduler>,
    records: Vec<SimRecord>,
}

impl Simulation {
    /// until_ms までに期限の来たタイマーとフレームを処理して記録する
    fn run_until(&mut self, until_ms: u64) {
        for (at_ms, event, frame) in self.carousel.advance_to(until_ms) {
            let cause = match event {
                CarouselEvent::AnimationFrame => Cause::Frame,
                _ => Cause::Timer,
            };
            self.records.push(SimRecord { at_ms, cause, frame });
        }
    }
}

/// 台本を最後まで再生する
pub fn run_script(config: &CarouselConfig, script: &SimScript) -> Result<Vec<SimRecord>, ConfigError> {
    let carousel = Carousel::new(
        config.clone(),
        script.card_count,
        script.viewport_width,
        script.geometry,
        ManualScheduler::new(),
    )
    .ok_or_else(|| ConfigError::invalid("script needs at least one card"))?;

    let mut sim = Simulation {
        carousel,
        records: Vec::new(),
    };
    let first = sim.carousel.init();
    sim.records.push(SimRecord {
        at_ms: 0,
        cause: Cause::Init,
        frame: first,
    });

    let mut steps: Vec<&SimStep> = script.steps.iter().collect();
    steps.sort_by_key(|s| s.at_ms);
    for step in steps {
        sim.run_until(step.at_ms);
        if let Some(geometry) = step.geometry {
            sim.carousel.update_geometry(geometry);
        }
        log::trace!("{}ms: {:?}", step.at_ms, step.event);
        if let Some(frame) = sim.carousel.handle(step.event.clone()) {
            sim.records.push(SimRecord {
                at_ms: step.at_ms,
                cause: Cause::Input,
                frame,
            });
        }
    }
    let end = script
        .run_until_ms
        .max(sim.carousel.scheduler().now_ms());
    sim.run_until(end);
    sim.carousel.destroy();

    log::info!(
        "replayed {} steps, {} frames, final index {}",
        script.steps.len(),
        sim.records.len(),
        sim.carousel.current_index()
    );
    Ok(sim.records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(json: &str) -> Vec<SimRecord> {
        let script = SimScript::from_json_str(json).unwrap();
        run_script(&CarouselConfig::default(), &script).unwrap()
    }

    fn last(records: &[SimRecord]) -> &TrackFrame {
        &records.last().unwrap().frame
    }

    const DESKTOP: &str = r#""viewport_width": 1440, "card_count": 10,
        "geometry": { "card_width": 280, "gap": 24, "container_width": 1200 }"#;

    const MOBILE: &str = r#""viewport_width": 375, "card_count": 10,
        "geometry": { "card_width": 300, "gap": 16, "container_width": 364 }"#;

    #[test]
    fn test_seven_nexts_wrap_to_start() {
        let steps: Vec<String> = (1..=7)
            .map(|i| format!(r#"{{ "at_ms": {}, "event": {{ "type": "next_pressed" }} }}"#, i * 100))
            .collect();
        let json = format!(r#"{{ {}, "steps": [{}] }}"#, DESKTOP, steps.join(","));
        let records = run(&json);

        let inputs: Vec<usize> = records
            .iter()
            .filter(|r| r.cause == Cause::Input)
            .map(|r| r.frame.active_card)
            .collect();
        assert_eq!(inputs, vec![1, 2, 3, 4, 5, 6, 0]);
        assert_eq!(records[0].frame.indicators.count, 7);
    }

    #[test]
    fn test_indicator_out_of_range_clamps() {
        let json = format!(
            r#"{{ {}, "steps": [{{ "at_ms": 10, "event": {{ "type": "indicator_activated", "index": 42 }} }}] }}"#,
            DESKTOP
        );
        let records = run(&json);
        assert_eq!(last(&records).active_card, 6);
        assert_eq!(last(&records).indicators.active, 6);
    }

    #[test]
    fn test_mobile_centering() {
        let json = format!(
            r#"{{ {}, "steps": [{{ "at_ms": 10, "event": {{ "type": "indicator_activated", "index": 2 }} }}] }}"#,
            MOBILE
        );
        let records = run(&json);
        assert_eq!(records[0].frame.translate_x, 32.0);
        assert_eq!(last(&records).translate_x, -600.0);
    }

    #[test]
    fn test_auto_advance_and_timer_reset() {
        let json = format!(
            r#"{{ {}, "run_until_ms": 7000,
                "steps": [{{ "at_ms": 3000, "event": {{ "type": "next_pressed" }} }}] }}"#,
            DESKTOP
        );
        let records = run(&json);
        let timeline: Vec<(u64, Cause, usize)> = records
            .iter()
            .map(|r| (r.at_ms, r.cause, r.frame.active_card))
            .collect();
        // 3000ms の手動操作でタイマーが張り直され、次の自動送りは 7000ms
        assert_eq!(
            timeline,
            vec![(0, Cause::Init, 0), (3000, Cause::Input, 1), (7000, Cause::Timer, 2)]
        );
    }

    #[test]
    fn test_hover_pauses_auto_advance() {
        let json = format!(
            r#"{{ {}, "run_until_ms": 20000, "steps": [
                {{ "at_ms": 1000, "event": {{ "type": "hover_changed", "inside": true }} }},
                {{ "at_ms": 1500, "event": {{ "type": "focus_changed", "inside": true }} }},
                {{ "at_ms": 9000, "event": {{ "type": "hover_changed", "inside": false }} }},
                {{ "at_ms": 12000, "event": {{ "type": "focus_changed", "inside": false }} }}
            ] }}"#,
            DESKTOP
        );
        let records = run(&json);
        let ticks: Vec<u64> = records
            .iter()
            .filter(|r| r.cause == Cause::Timer)
            .map(|r| r.at_ms)
            .collect();
        assert_eq!(ticks, vec![16000, 20000]);
    }

    #[test]
    fn test_no_overflow_never_ticks() {
        let json = r#"{ "viewport_width": 1440, "card_count": 3, "run_until_ms": 30000,
            "geometry": { "card_width": 280, "gap": 24, "container_width": 1200 } }"#;
        let records = run(json);
        assert_eq!(records.len(), 1);
        assert!(!records[0].frame.controls_visible);
        assert_eq!(records[0].frame.indicators.count, 1);
    }

    fn drag_script(release_x: u32) -> String {
        format!(
            r#"{{ "viewport_width": 1440, "card_count": 10,
                "geometry": {{ "card_width": 400, "gap": 24, "container_width": 1200 }},
                "steps": [
                    {{ "at_ms": 100, "event": {{ "type": "drag_start", "x": 500 }} }},
                    {{ "at_ms": 105, "event": {{ "type": "drag_move", "x": {} }} }},
                    {{ "at_ms": 140, "event": {{ "type": "drag_end" }} }}
                ] }}"#,
            release_x
        )
    }

    #[test]
    fn test_drag_threshold_is_strict() {
        // 400px カードのしきい値は 50px ちょうど
        let records = run(&drag_script(450));
        assert_eq!(last(&records).active_card, 0);

        let records = run(&drag_script(449));
        assert_eq!(last(&records).active_card, 1);
    }

    #[test]
    fn test_drag_frames_only_while_dragging() {
        let records = run(&drag_script(449));
        let frames: Vec<&SimRecord> = records.iter().filter(|r| r.cause == Cause::Frame).collect();
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|r| r.at_ms > 100 && r.at_ms < 140));
        assert!(frames.iter().all(|r| r.frame.transition == crate::engine::Transition::Immediate));
        // 追従中は 51px ずれた位置
        assert_eq!(frames[frames.len() - 1].frame.translate_x, -51.0);
    }

    #[test]
    fn test_resize_to_wider_tier_resets_index() {
        let json = format!(
            r#"{{ {}, "steps": [
                {{ "at_ms": 10, "event": {{ "type": "indicator_activated", "index": 2 }} }},
                {{ "at_ms": 20, "event": {{ "type": "resized", "viewport_width": 1100 }},
                  "geometry": {{ "card_width": 300, "gap": 24, "container_width": 1000 }} }}
            ] }}"#,
            MOBILE
        );
        let records = run(&json);
        let frame = last(&records);
        assert_eq!(frame.active_card, 0);
        assert_eq!(frame.translate_x, 0.0);
        assert_eq!(frame.indicators.count, 8);
    }

    #[test]
    fn test_rejects_empty_script() {
        let err = SimScript::from_json_str(
            r#"{ "viewport_width": 1440, "card_count": 0,
                 "geometry": { "card_width": 1, "gap": 0, "container_width": 1 } }"#,
        );
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
        assert!(matches!(SimScript::from_json_str("{"), Err(ConfigError::Parse(_))));
    }
}
