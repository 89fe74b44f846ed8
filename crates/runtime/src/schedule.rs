//! Timers owned by layout instances.
//!
//! Every timer the widget runs is a [`ScheduledTask`]: a spawned tokio task
//! tied to a child of the activation's page-unload token. Unloading the
//! page (or stopping the task explicitly) ends the loop at its next
//! suspension point.

use std::time::Duration;

use proofwall_core::layout::{spotlight_item_id, SpotlightRotation, ACTIVE_CLASS};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::document::SharedDocument;

/// Handle to a running timer task.
pub struct ScheduledTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Ask the task to stop. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

/// Rotate the active spotlight item every `period`.
///
/// Item ids follow [`spotlight_item_id`]; exactly one item carries
/// [`ACTIVE_CLASS`] at any time. The task ends on unload, on
/// [`ScheduledTask::stop`], or when the spotlight is no longer mounted.
pub fn spawn_rotation(
    document: SharedDocument,
    period: Duration,
    count: usize,
    unload: &CancellationToken,
) -> ScheduledTask {
    let cancel = unload.child_token();
    let token = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut rotation = SpotlightRotation::new(count);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(count, period_ms = period.as_millis() as u64, "Spotlight rotation started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let previous = rotation.active();
                    let next = rotation.advance();
                    let mut doc = document.lock().await;
                    if !doc.contains(&spotlight_item_id(next)) {
                        tracing::debug!("Spotlight no longer mounted; stopping rotation");
                        break;
                    }
                    doc.set_class(&spotlight_item_id(previous), ACTIVE_CLASS, false);
                    doc.set_class(&spotlight_item_id(next), ACTIVE_CLASS, true);
                }
            }
        }
    });

    ScheduledTask { cancel, handle }
}
