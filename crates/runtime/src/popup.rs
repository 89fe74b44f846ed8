//! Trigger-activated popup shell.
//!
//! Nothing is mounted until the trigger fires. On fire the persistence gate
//! is consulted first; only an open gate leads to the (single) fetch. Empty
//! and failed fetches are silent: the popup never appears and the trigger
//! settles in `Suppressed`. A rendered popup closes on its close control,
//! on `Escape` or on a click on the overlay backdrop, and never re-arms.

use std::sync::Arc;

use proofwall_core::config::TriggerKind;
use proofwall_core::gate::{FlagStore, PersistenceGate};
use proofwall_core::markup::Element;
use proofwall_core::source::TestimonialSource;
use proofwall_core::trigger::{
    scroll_fraction, TriggerEvent, TriggerMachine, TriggerPolicy, TriggerState,
};
use proofwall_core::{FetchOutcome, WidgetConfig, WidgetPayload};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::activation::Activation;
use crate::content::render_content;
use crate::document::SharedDocument;
use crate::events::HostEvent;
use crate::schedule::{spawn_rotation, ScheduledTask};

pub const OVERLAY_ID: &str = "pw-popup-overlay";
pub const MODAL_ID: &str = "pw-popup-modal";
pub const CLOSE_ID: &str = "pw-popup-close";

pub struct PopupShell {
    config: WidgetConfig,
    document: SharedDocument,
    source: Arc<dyn TestimonialSource>,
    store: Box<dyn FlagStore + Send>,
    gate: PersistenceGate,
    machine: TriggerMachine,
    rotation: Option<ScheduledTask>,
    unload: CancellationToken,
}

impl PopupShell {
    /// Arm the trigger. The document is not touched until it fires.
    pub fn new(
        activation: &Activation,
        source: Arc<dyn TestimonialSource>,
        store: Box<dyn FlagStore + Send>,
    ) -> Self {
        let config = activation.config().clone();
        let machine = TriggerMachine::new(TriggerPolicy::from(&config));
        tracing::debug!(
            workspace_id = %config.workspace_id,
            trigger = config.trigger_kind.as_str(),
            "Popup trigger armed",
        );

        Self {
            gate: PersistenceGate::for_workspace(&config.workspace_id),
            config,
            document: activation.document(),
            source,
            store,
            machine,
            rotation: None,
            unload: activation.unload_token().clone(),
        }
    }

    pub fn state(&self) -> TriggerState {
        self.machine.state()
    }

    /// Whether the exit-intent listener is still attached.
    pub fn exit_listener_attached(&self) -> bool {
        self.machine.exit_listener_attached()
    }

    pub async fn is_visible(&self) -> bool {
        self.document.lock().await.contains(OVERLAY_ID)
    }

    /// Give the flag store back, e.g. to carry it into the next page load.
    pub fn into_store(self) -> Box<dyn FlagStore + Send> {
        if let Some(task) = &self.rotation {
            task.stop();
        }
        self.store
    }

    /// React to one host-page event.
    pub async fn handle(&mut self, event: &HostEvent) {
        if self.machine.state() == TriggerState::Shown {
            if is_close_request(event) {
                self.close().await;
            }
            return;
        }
        // Listeners do no work once the trigger has left `Waiting`.
        if !self.machine.is_armed() {
            return;
        }

        let input = match event {
            HostEvent::Scroll {
                scroll_top,
                scroll_height,
                viewport_height,
            } => TriggerEvent::Scrolled {
                fraction: scroll_fraction(*scroll_top, *scroll_height, *viewport_height),
            },
            HostEvent::PointerOut {
                client_y,
                leaving_document,
            } => TriggerEvent::PointerLeft {
                client_y: *client_y,
                leaving_document: *leaving_document,
            },
            HostEvent::Click { .. } | HostEvent::KeyDown { .. } => return,
        };

        if self.machine.on_input(input) {
            self.fire().await;
        }
    }

    /// The time-trigger delay has elapsed.
    pub async fn on_delay_elapsed(&mut self) {
        if self.machine.on_input(TriggerEvent::DelayElapsed) {
            self.fire().await;
        }
    }

    /// Fire the trigger now with whatever input its kind expects.
    pub async fn force_trigger(&mut self) {
        let input = match self.config.trigger_kind {
            TriggerKind::Time => TriggerEvent::DelayElapsed,
            TriggerKind::Scroll => TriggerEvent::Scrolled { fraction: 1.0 },
            TriggerKind::ExitIntent => TriggerEvent::PointerLeft {
                client_y: 0.0,
                leaving_document: true,
            },
        };
        if self.machine.on_input(input) {
            self.fire().await;
        }
    }

    /// Drive the shell until the trigger settles, the page unloads or the
    /// event stream ends.
    ///
    /// The time-trigger delay starts when this is called.
    pub async fn run(mut self, mut events: mpsc::Receiver<HostEvent>) -> Self {
        let unload = self.unload.clone();
        let delay = tokio::time::sleep(self.config.delay());
        tokio::pin!(delay);
        let mut delay_pending = self.config.trigger_kind == TriggerKind::Time;
        let mut events_open = true;

        while !self.machine.state().is_terminal() {
            if !events_open && !delay_pending {
                break;
            }
            tokio::select! {
                _ = unload.cancelled() => {
                    tracing::debug!("Popup loop stopped by unload");
                    break;
                }
                _ = &mut delay, if delay_pending => {
                    delay_pending = false;
                    self.on_delay_elapsed().await;
                }
                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle(&event).await,
                    None => events_open = false,
                },
            }
        }

        self
    }

    async fn fire(&mut self) {
        let workspace_id = self.config.workspace_id.clone();

        if self.gate.is_blocked(self.config.show_once, &*self.store) {
            tracing::info!(
                workspace_id = %workspace_id,
                "Popup already shown on this device; suppressed",
            );
            self.advance(TriggerEvent::GateBlocked);
            return;
        }
        self.advance(TriggerEvent::GateOpen);

        match self.source.fetch(&workspace_id).await {
            FetchOutcome::Loaded(payload) => {
                self.mount(&payload).await;
                self.advance(TriggerEvent::Rendered);
                if self.config.show_once {
                    self.gate.mark_shown(&mut *self.store);
                }
                tracing::info!(
                    workspace_id = %workspace_id,
                    count = payload.testimonials.len(),
                    "Popup shown",
                );
            }
            FetchOutcome::Empty => {
                tracing::info!(
                    workspace_id = %workspace_id,
                    "No testimonials; popup suppressed",
                );
                self.advance(TriggerEvent::FetchEmpty);
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!(
                    workspace_id = %workspace_id,
                    error = %e,
                    "Popup suppressed after fetch failure",
                );
                self.advance(TriggerEvent::FetchFailed);
            }
        }
    }

    async fn mount(&mut self, payload: &WidgetPayload) {
        let content = render_content(payload, &self.config);
        self.document
            .lock()
            .await
            .mount(build_overlay(&self.config, content.layout));

        if let Some((period, count)) = content.rotation {
            self.rotation = Some(spawn_rotation(
                self.document.clone(),
                period,
                count,
                &self.unload,
            ));
        }
    }

    async fn close(&mut self) {
        if let Some(task) = self.rotation.take() {
            task.stop();
        }
        self.document.lock().await.unmount(OVERLAY_ID);
        self.advance(TriggerEvent::Closed);
        tracing::debug!(workspace_id = %self.config.workspace_id, "Popup closed");
    }

    fn advance(&mut self, event: TriggerEvent) {
        if let Err(e) = self.machine.apply(event) {
            tracing::error!(error = %e, "Popup trigger out of sequence");
        }
    }
}

/// Close control, `Escape`, or a click on the backdrop itself.
fn is_close_request(event: &HostEvent) -> bool {
    event.is_escape() || matches!(event.click_target(), Some(OVERLAY_ID | CLOSE_ID))
}

fn build_overlay(config: &WidgetConfig, layout: Element) -> Element {
    let modal = Element::new("div")
        .with_id(MODAL_ID)
        .class("pw-popup-modal")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .child(
            Element::new("button")
                .with_id(CLOSE_ID)
                .class("pw-close")
                .attr("type", "button")
                .attr("aria-label", "Close")
                .text("\u{00D7}"),
        )
        .child(layout);

    Element::new("div")
        .with_id(OVERLAY_ID)
        .class("pw-root")
        .class("pw-popup-overlay")
        .class(format!("pw-theme-{}", config.theme.as_str()))
        .child(modal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_requests() {
        assert!(is_close_request(&HostEvent::key("Escape")));
        assert!(is_close_request(&HostEvent::click(OVERLAY_ID)));
        assert!(is_close_request(&HostEvent::click(CLOSE_ID)));
        assert!(!is_close_request(&HostEvent::click(MODAL_ID)));
        assert!(!is_close_request(&HostEvent::key("Enter")));
        assert!(!is_close_request(&HostEvent::click_outside()));
    }

    #[test]
    fn overlay_wraps_modal_and_close_control() {
        let overlay = build_overlay(
            &WidgetConfig::with_defaults("ws1"),
            Element::new("div").with_id("layout"),
        );
        assert!(overlay.has_class("pw-popup-overlay"));
        let modal = overlay.find(MODAL_ID).unwrap();
        assert!(modal.find(CLOSE_ID).is_some());
        assert!(modal.find("layout").is_some());
    }
}
