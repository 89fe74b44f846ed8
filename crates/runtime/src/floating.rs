//! Floating presentation shell: a corner launcher and a slide-in panel.
//!
//! The launcher and an empty panel are mounted eagerly. Testimonials are
//! fetched lazily on the first `Closed -> Open` transition and never again;
//! later open/close cycles only toggle the panel's `pw-open` class.
//!
//! | State  | Event                     | Next   |
//! |--------|---------------------------|--------|
//! | Closed | launcher click            | Open   |
//! | Open   | launcher click            | Closed |
//! | Open   | close control             | Closed |
//! | Open   | click outside the widget  | Closed |

use std::sync::Arc;

use proofwall_core::markup::{Element, Node};
use proofwall_core::source::TestimonialSource;
use proofwall_core::{FetchOutcome, WidgetConfig};
use tokio_util::sync::CancellationToken;

use crate::activation::Activation;
use crate::content::{notice, render_content, EMPTY_NOTICE, ERROR_NOTICE, LOADING_NOTICE};
use crate::document::SharedDocument;
use crate::events::HostEvent;
use crate::schedule::{spawn_rotation, ScheduledTask};

pub const ROOT_ID: &str = "pw-floating-root";
pub const LAUNCHER_ID: &str = "pw-launcher";
pub const PANEL_ID: &str = "pw-panel";
pub const PANEL_BODY_ID: &str = "pw-panel-body";
pub const CLOSE_ID: &str = "pw-panel-close";

/// Class that makes the panel visible.
pub const OPEN_CLASS: &str = "pw-open";

/// Mutated only by user interaction and fetch completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub is_open: bool,
    pub testimonials_loaded: bool,
}

pub struct FloatingShell {
    config: WidgetConfig,
    document: SharedDocument,
    source: Arc<dyn TestimonialSource>,
    unload: CancellationToken,
    state: DisplayState,
    rotation: Option<ScheduledTask>,
}

impl FloatingShell {
    /// Mount the launcher and the closed panel.
    pub async fn mount(activation: &Activation, source: Arc<dyn TestimonialSource>) -> Self {
        let config = activation.config().clone();
        let document = activation.document();

        document.lock().await.mount(build_shell(&config));
        tracing::debug!(workspace_id = %config.workspace_id, "Floating shell mounted");

        Self {
            config,
            document,
            source,
            unload: activation.unload_token().clone(),
            state: DisplayState::default(),
            rotation: None,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Whether a spotlight rotation was started and is still running.
    pub fn is_rotating(&self) -> bool {
        self.rotation.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// React to one host-page event.
    pub async fn handle(&mut self, event: &HostEvent) {
        let HostEvent::Click { target } = event else {
            return;
        };

        match target.as_deref() {
            Some(LAUNCHER_ID) => self.toggle().await,
            Some(CLOSE_ID) => self.close().await,
            Some(id) => {
                if !self.is_inside_widget(id).await {
                    self.close().await;
                }
            }
            None => self.close().await,
        }
    }

    pub async fn toggle(&mut self) {
        if self.state.is_open {
            self.close().await;
        } else {
            self.open().await;
        }
    }

    pub async fn open(&mut self) {
        if self.state.is_open {
            return;
        }
        self.state.is_open = true;
        self.document.lock().await.set_class(PANEL_ID, OPEN_CLASS, true);

        if !self.state.testimonials_loaded {
            // Set before the request so overlapping opens cannot fetch twice.
            self.state.testimonials_loaded = true;
            self.load().await;
        }
    }

    pub async fn close(&mut self) {
        if !self.state.is_open {
            return;
        }
        self.state.is_open = false;
        self.document.lock().await.set_class(PANEL_ID, OPEN_CLASS, false);
    }

    async fn is_inside_widget(&self, id: &str) -> bool {
        self.document.lock().await.is_within(ROOT_ID, id)
    }

    async fn load(&mut self) {
        self.replace_body(notice("loading", LOADING_NOTICE)).await;

        let outcome = self.source.fetch(&self.config.workspace_id).await;
        match outcome {
            FetchOutcome::Loaded(payload) => {
                let content = render_content(&payload, &self.config);
                self.replace_body(content.layout).await;
                if let Some((period, count)) = content.rotation {
                    self.rotation = Some(spawn_rotation(
                        self.document.clone(),
                        period,
                        count,
                        &self.unload,
                    ));
                }
            }
            FetchOutcome::Empty => {
                self.replace_body(notice("empty", EMPTY_NOTICE)).await;
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!(
                    workspace_id = %self.config.workspace_id,
                    error = %e,
                    "Showing load failure in floating panel",
                );
                self.replace_body(notice("error", ERROR_NOTICE)).await;
            }
        }
    }

    async fn replace_body(&self, content: Element) {
        let mut doc = self.document.lock().await;
        if !doc.replace_children(PANEL_BODY_ID, vec![Node::Element(content)]) {
            tracing::warn!("Floating panel body missing; content not rendered");
        }
    }
}

/// Launcher button plus the hidden panel skeleton.
fn build_shell(config: &WidgetConfig) -> Element {
    let launcher = Element::new("button")
        .with_id(LAUNCHER_ID)
        .class("pw-launcher")
        .attr("type", "button")
        .attr("aria-controls", PANEL_ID)
        .child(
            Element::new("span")
                .class("pw-launcher-icon")
                .attr("aria-hidden", "true")
                .text(config.launcher_icon.glyph()),
        )
        .child(
            Element::new("span")
                .class("pw-launcher-text")
                .text(config.launcher_text.as_str()),
        );

    let header = Element::new("div")
        .class("pw-panel-header")
        .child(
            Element::new("span")
                .class("pw-panel-title")
                .text(config.launcher_text.as_str()),
        )
        .child(
            Element::new("button")
                .with_id(CLOSE_ID)
                .class("pw-close")
                .attr("type", "button")
                .attr("aria-label", "Close")
                .text("\u{00D7}"),
        );

    let panel = Element::new("div")
        .with_id(PANEL_ID)
        .class("pw-panel")
        .attr("role", "dialog")
        .attr("aria-label", config.launcher_text.as_str())
        .child(header)
        .child(
            Element::new("div")
                .with_id(PANEL_BODY_ID)
                .class("pw-panel-body"),
        );

    Element::new("div")
        .with_id(ROOT_ID)
        .class("pw-root")
        .class(format!("pw-theme-{}", config.theme.as_str()))
        .class(format!("pw-position-{}", config.position.as_str()))
        .child(launcher)
        .child(panel)
}

#[cfg(test)]
mod tests {
    use proofwall_core::config::{LauncherIcon, Position, Theme};

    use super::*;

    #[test]
    fn shell_skeleton_has_controls_and_closed_panel() {
        let mut config = WidgetConfig::with_defaults("ws1");
        config.theme = Theme::Dark;
        config.position = Position::TopLeft;
        config.launcher_icon = LauncherIcon::Chat;
        config.launcher_text = "Reviews".into();

        let shell = build_shell(&config);
        assert!(shell.has_class("pw-theme-dark"));
        assert!(shell.has_class("pw-position-top-left"));
        let launcher = shell.find(LAUNCHER_ID).unwrap();
        assert!(launcher.text_content().contains("Reviews"));
        assert!(launcher.text_content().contains(LauncherIcon::Chat.glyph()));
        assert!(shell.find(CLOSE_ID).is_some());
        let panel = shell.find(PANEL_ID).unwrap();
        assert!(!panel.has_class(OPEN_CLASS));
        assert!(shell.find(PANEL_BODY_ID).unwrap().child_nodes().is_empty());
    }
}
