//! Fragments shared by both shells: the testimonial layout and notices.

use std::time::Duration;

use proofwall_core::card::render_card;
use proofwall_core::layout::{compose_layout, LayoutOptions};
use proofwall_core::markup::Element;
use proofwall_core::{WidgetConfig, WidgetPayload};

pub const EMPTY_NOTICE: &str = "No testimonials yet.";
pub const ERROR_NOTICE: &str = "Failed to load testimonials.";
pub const LOADING_NOTICE: &str = "Loading testimonials\u{2026}";

/// Composed layout plus the rotation period it needs, if any.
pub struct RenderedContent {
    pub layout: Element,
    pub rotation: Option<(Duration, usize)>,
}

/// Render every card and arrange them with the configured layout.
pub fn render_content(payload: &WidgetPayload, config: &WidgetConfig) -> RenderedContent {
    let options = LayoutOptions::from(config);
    let cards: Vec<Element> = payload
        .testimonials
        .iter()
        .map(|t| render_card(t, config.theme))
        .collect();
    let count = cards.len();

    let rotation = config
        .layout
        .rotation_period(&options, count)
        .map(|period| (period, count));

    RenderedContent {
        layout: compose_layout(config.layout, cards, payload.show_badge, &options),
        rotation,
    }
}

pub fn notice(kind: &str, text: &str) -> Element {
    Element::new("div")
        .class("pw-notice")
        .class(format!("pw-notice-{kind}"))
        .text(text)
}
