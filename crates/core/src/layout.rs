//! Layout strategies that arrange rendered cards.
//!
//! Composition is pure: [`compose_layout`] only builds the fragment. The
//! one strategy with behaviour over time (spotlight) exposes its rotation
//! as [`SpotlightRotation`], which the runtime drives from a scheduled task.
//! Marquee motion is a CSS animation and needs no timer.

use std::time::Duration;

use crate::config::{LayoutKind, WidgetConfig};
use crate::markup::Element;

/// Link target of the "Powered by" badge.
pub const BADGE_URL: &str = "https://www.proofwall.io/?ref=widget";

pub const BADGE_TEXT: &str = "Powered by Proofwall";

/// Class marking the visible spotlight item.
pub const ACTIVE_CLASS: &str = "pw-active";

/// Id of the `index`-th spotlight item.
pub fn spotlight_item_id(index: usize) -> String {
    format!("pw-spotlight-item-{index}")
}

/// Timing knobs consumed by the animated layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub marquee_speed_secs: u64,
    pub auto_rotate: Duration,
}

impl From<&WidgetConfig> for LayoutOptions {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            marquee_speed_secs: config.marquee_speed_secs,
            auto_rotate: config.auto_rotate(),
        }
    }
}

impl LayoutKind {
    /// Rotation period the spotlight needs for `card_count` cards, if any.
    ///
    /// Single-card (and empty) spotlights never rotate.
    pub fn rotation_period(&self, options: &LayoutOptions, card_count: usize) -> Option<Duration> {
        match self {
            LayoutKind::Spotlight if card_count > 1 && !options.auto_rotate.is_zero() => {
                Some(options.auto_rotate)
            }
            _ => None,
        }
    }
}

/// Arrange `cards` according to `kind`, appending the badge when requested.
pub fn compose_layout(
    kind: LayoutKind,
    cards: Vec<Element>,
    show_badge: bool,
    options: &LayoutOptions,
) -> Element {
    let body = match kind {
        LayoutKind::Grid => Element::new("div").class("pw-grid").children(cards),
        LayoutKind::List => Element::new("div").class("pw-list").children(cards),
        LayoutKind::Carousel => carousel(cards),
        LayoutKind::Marquee => marquee(cards, options.marquee_speed_secs),
        LayoutKind::Masonry => Element::new("div").class("pw-masonry").children(
            cards
                .into_iter()
                .map(|card| Element::new("div").class("pw-masonry-item").child(card)),
        ),
        LayoutKind::Spotlight => spotlight(cards),
    };

    let mut root = Element::new("div")
        .class("pw-layout")
        .class(format!("pw-layout-{}", kind.as_str()))
        .child(body);
    if show_badge {
        root = root.child(badge());
    }
    root
}

/// Navigation is the track's own horizontal scroll; there are no controls.
fn carousel(cards: Vec<Element>) -> Element {
    let slides = cards
        .into_iter()
        .map(|card| Element::new("div").class("pw-carousel-slide").child(card));

    Element::new("div")
        .class("pw-carousel")
        .child(Element::new("div").class("pw-carousel-track").children(slides))
}

/// The sequence is rendered twice so a `-50%` translation loops seamlessly.
fn marquee(cards: Vec<Element>, speed_secs: u64) -> Element {
    let clones: Vec<Element> = cards
        .iter()
        .cloned()
        .map(|card| card.class("pw-marquee-clone").attr("aria-hidden", "true"))
        .collect();

    Element::new("div").class("pw-marquee").child(
        Element::new("div")
            .class("pw-marquee-track")
            .attr("style", format!("animation-duration: {speed_secs}s"))
            .children(cards)
            .children(clones),
    )
}

fn spotlight(cards: Vec<Element>) -> Element {
    let items = cards.into_iter().enumerate().map(|(i, card)| {
        let item = Element::new("div")
            .with_id(spotlight_item_id(i))
            .class("pw-spotlight-item")
            .child(card);
        if i == 0 {
            item.class(ACTIVE_CLASS)
        } else {
            item
        }
    });
    Element::new("div").class("pw-spotlight").children(items)
}

fn badge() -> Element {
    Element::new("div").class("pw-badge").child(
        Element::new("a")
            .attr("href", BADGE_URL)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(BADGE_TEXT),
    )
}

// ---------------------------------------------------------------------------
// Spotlight rotation
// ---------------------------------------------------------------------------

/// Active-index bookkeeping for the spotlight layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotlightRotation {
    count: usize,
    active: usize,
}

impl SpotlightRotation {
    pub fn new(count: usize) -> Self {
        Self { count, active: 0 }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Move to the next card (modulo count) and return the new index.
    pub fn advance(&mut self) -> usize {
        if self.count > 1 {
            self.active = (self.active + 1) % self.count;
        }
        self.active
    }

    /// Index active after `ticks` periods have elapsed from the start.
    pub fn active_after(&self, ticks: u64) -> usize {
        if self.count <= 1 {
            return 0;
        }
        (ticks % self.count as u64) as usize
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
