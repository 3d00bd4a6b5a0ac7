// DOM に書き込む文字列表現
// ブラウザアダプタとネイティブのシミュレータで共有する

use crate::engine::frame::{TrackFrame, Transition};

/// ホスト側マークアップの約束事
pub const TRACK_ID: &str = "crCarousel";
pub const CARD_CLASS: &str = "cr-course-card";
pub const PREV_BUTTON_ID: &str = "crSidePrevBtn";
pub const NEXT_BUTTON_ID: &str = "crSideNextBtn";
pub const INDICATORS_ID: &str = "crIndicators";
pub const WRAPPER_CLASS: &str = "cr-carousel-wrapper";
pub const CONTAINER_CLASS: &str = "cr-carousel-container";
pub const INDICATOR_CLASS: &str = "cr-indicator";
pub const ACTIVE_CLASS: &str = "active";
/// コンテナに JSON で CarouselConfig を埋め込むための属性
pub const CONFIG_ATTR: &str = "data-slidekit-config";
/// body に SiteConfig を埋め込むための属性
pub const SITE_CONFIG_ATTR: &str = "data-slidekit-site";

/// 計算済みスタイルの "24px" などを数値にする。解釈できなければ 0
pub fn parse_px(value: &str) -> f32 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn transform_value(translate_x: f32) -> String {
    format!("translateX({}px)", translate_x)
}

pub fn transition_value(transition: &Transition) -> String {
    match transition {
        Transition::Immediate => "none".to_string(),
        Transition::Animated { duration_ms, easing } => {
            format!("transform {}s {}", *duration_ms as f32 / 1000.0, easing)
        }
    }
}

pub fn visibility_value(visible: bool) -> &'static str {
    if visible { "visible" } else { "hidden" }
}

pub fn indicator_class(active: bool) -> String {
    if active {
        format!("{} {}", INDICATOR_CLASS, ACTIVE_CLASS)
    } else {
        INDICATOR_CLASS.to_string()
    }
}

pub fn indicator_label(index: usize) -> String {
    format!("Go to slide {}", index + 1)
}

/// フレームをHTML断片にする（ネイティブ環境での確認用）
pub fn render_track_html(frame: &TrackFrame, card_count: usize) -> String {
    let mut html = Vec::new();
    html.push(format!(
        r#"<div id="{}" style="transform: {}; transition: {}">"#,
        TRACK_ID,
        transform_value(frame.translate_x),
        transition_value(&frame.transition)
    ));
    for i in 0..card_count {
        let class = if i == frame.active_card {
            format!("{} {}", CARD_CLASS, ACTIVE_CLASS)
        } else {
            CARD_CLASS.to_string()
        };
        html.push(format!(r#"  <div class="{}"></div>"#, class));
    }
    html.push("</div>".to_string());

    let visibility = visibility_value(frame.controls_visible);
    html.push(format!(
        r#"<button id="{}" style="visibility: {}"></button>"#,
        PREV_BUTTON_ID, visibility
    ));
    html.push(format!(
        r#"<button id="{}" style="visibility: {}"></button>"#,
        NEXT_BUTTON_ID, visibility
    ));

    html.push(format!(r#"<div id="{}">"#, INDICATORS_ID));
    for i in 0..frame.indicators.count {
        html.push(format!(
            r#"  <div class="{}" role="button" tabindex="0" aria-label="{}"></div>"#,
            indicator_class(i == frame.indicators.active),
            indicator_label(i)
        ));
    }
    html.push("</div>".to_string());
    html.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frame::IndicatorState;

    fn frame() -> TrackFrame {
        TrackFrame {
            translate_x: -608.0,
            active_card: 2,
            indicators: IndicatorState { count: 3, active: 2 },
            controls_visible: true,
            transition: Transition::Animated {
                duration_ms: 400,
                easing: "cubic-bezier(0.25,0.46,0.45,0.94)".to_string(),
            },
        }
    }

    #[test]
    fn test_style_values() {
        assert_eq!(transform_value(-608.0), "translateX(-608px)");
        assert_eq!(transform_value(32.5), "translateX(32.5px)");
        assert_eq!(
            transition_value(&frame().transition),
            "transform 0.4s cubic-bezier(0.25,0.46,0.45,0.94)"
        );
        assert_eq!(transition_value(&Transition::Immediate), "none");
        assert_eq!(visibility_value(false), "hidden");
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("24px"), 24.0);
        assert_eq!(parse_px(" 16.5px "), 16.5);
        assert_eq!(parse_px("normal"), 0.0);
        assert_eq!(parse_px(""), 0.0);
    }

    #[test]
    fn test_indicator_markup() {
        assert_eq!(indicator_class(true), "cr-indicator active");
        assert_eq!(indicator_label(0), "Go to slide 1");
    }

    #[test]
    fn test_track_html_marks_single_active_card() {
        let html = render_track_html(&frame(), 4);
        assert_eq!(html.matches("cr-course-card active").count(), 1);
        assert_eq!(html.matches(r#"class="cr-indicator"#).count(), 3);
        assert!(html.contains("aria-label=\"Go to slide 3\""));
        assert!(html.contains("translateX(-608px)"));
    }
}
