#![allow(dead_code)]

use std::sync::Arc;

use proofwall_core::source::FixedSource;
use proofwall_core::testimonial::Testimonial;
use proofwall_core::{FetchOutcome, ScriptAttributes, WidgetPayload};
use proofwall_runtime::{Activation, HostDocument, SharedDocument};

pub const SCRIPT_SRC: &str = "https://www.proofwall.io/widget.js";

/// The single five-star testimonial served for `ws1`.
pub fn jane_doe() -> Testimonial {
    Testimonial {
        rating: Some(5),
        testimonial: Some("Great!".into()),
        ..Testimonial::text("t1", "Jane Doe")
    }
}

pub fn loaded(testimonials: Vec<Testimonial>, show_badge: bool) -> FetchOutcome {
    FetchOutcome::Loaded(WidgetPayload {
        testimonials,
        show_badge,
    })
}

/// `n` plain testimonials named `Person 0..n`.
pub fn people(n: usize) -> Vec<Testimonial> {
    (0..n)
        .map(|i| Testimonial::text(format!("t{i}"), format!("Person {i}")))
        .collect()
}

pub fn source(outcome: FetchOutcome) -> Arc<FixedSource> {
    Arc::new(FixedSource::new(outcome))
}

/// Activate against a fresh document with the given `data-*` attributes.
pub async fn activate(attrs: &[(&str, &str)]) -> (Activation, SharedDocument) {
    let attrs: ScriptAttributes = attrs.iter().copied().collect();
    let document = HostDocument::shared();
    let activation = Activation::start(&attrs, SCRIPT_SRC, document.clone())
        .await
        .expect("activation should start");
    (activation, document)
}
