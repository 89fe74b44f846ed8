//! Seam between the shells and the network.
//!
//! Shells only see [`TestimonialSource`]; the HTTP implementation lives in
//! `proofwall-client`. [`FixedSource`] serves a canned outcome for offline
//! previews and tests and counts how often it was asked.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::testimonial::FetchOutcome;

/// Something that can produce a workspace's testimonials.
///
/// Implementations must not panic or return early with an error: every
/// failure is reported through [`FetchOutcome::Failed`].
#[async_trait]
pub trait TestimonialSource: Send + Sync {
    async fn fetch(&self, workspace_id: &str) -> FetchOutcome;
}

/// A source that always answers with the same outcome.
pub struct FixedSource {
    outcome: FetchOutcome,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TestimonialSource for FixedSource {
    async fn fetch(&self, workspace_id: &str) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(workspace_id, "Serving fixed testimonial outcome");
        self.outcome.clone()
    }
}
