//! Popup trigger state machine.
//!
//! ```text
//! Waiting --(matching input)--> Fired --GateOpen--> Shown --Closed--> Closed
//!                                 |                   |
//!                                 +--GateBlocked-->  Suppressed <--FetchEmpty/FetchFailed
//! ```
//!
//! `Suppressed` and `Closed` are terminal: the trigger never re-arms
//! within an activation. All transitions go through [`transition`], so the
//! machine can be tested without any host page.

use serde::Serialize;

use crate::config::{TriggerKind, WidgetConfig};
use crate::error::WidgetError;

// ---------------------------------------------------------------------------
// States and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    Waiting,
    Fired,
    Shown,
    Suppressed,
    Closed,
}

impl TriggerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Fired => "fired",
            Self::Shown => "shown",
            Self::Suppressed => "suppressed",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Suppressed | Self::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    /// The time-trigger delay has elapsed.
    DelayElapsed,
    /// Vertical scroll position as a fraction of the scrollable height.
    Scrolled { fraction: f64 },
    /// The pointer left an element; `leaving_document` is true when it
    /// moved to no element at all.
    PointerLeft { client_y: f64, leaving_document: bool },
    /// The persistence gate says the popup was already shown.
    GateBlocked,
    GateOpen,
    FetchEmpty,
    FetchFailed,
    Rendered,
    Closed,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DelayElapsed => "delay_elapsed",
            Self::Scrolled { .. } => "scrolled",
            Self::PointerLeft { .. } => "pointer_left",
            Self::GateBlocked => "gate_blocked",
            Self::GateOpen => "gate_open",
            Self::FetchEmpty => "fetch_empty",
            Self::FetchFailed => "fetch_failed",
            Self::Rendered => "rendered",
            Self::Closed => "closed",
        }
    }

    /// Whether this is a host-page input (as opposed to a lifecycle step).
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::DelayElapsed | Self::Scrolled { .. } | Self::PointerLeft { .. }
        )
    }
}

/// The parts of the configuration the trigger depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPolicy {
    pub kind: TriggerKind,
    /// Scroll fraction in `0.0..=1.0` that fires a scroll trigger.
    pub scroll_threshold: f64,
    pub show_once: bool,
}

impl From<&WidgetConfig> for TriggerPolicy {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            kind: config.trigger_kind,
            scroll_threshold: config.scroll_threshold(),
            show_once: config.show_once,
        }
    }
}

impl TriggerPolicy {
    /// Whether a host-page input satisfies this policy's trigger kind.
    pub fn is_satisfied_by(&self, event: &TriggerEvent) -> bool {
        match (self.kind, event) {
            (TriggerKind::Time, TriggerEvent::DelayElapsed) => true,
            (TriggerKind::Scroll, TriggerEvent::Scrolled { fraction }) => {
                *fraction >= self.scroll_threshold
            }
            (
                TriggerKind::ExitIntent,
                TriggerEvent::PointerLeft {
                    client_y,
                    leaving_document,
                },
            ) => *leaving_document && *client_y <= 0.0,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Compute the next state. Pairs outside the table are errors.
pub fn transition(
    state: TriggerState,
    event: &TriggerEvent,
    policy: &TriggerPolicy,
) -> Result<TriggerState, WidgetError> {
    use TriggerEvent as E;
    use TriggerState as S;

    let next = match (state, event) {
        (S::Waiting, e) if e.is_input() => {
            if policy.is_satisfied_by(e) {
                S::Fired
            } else {
                S::Waiting
            }
        }
        (S::Fired, e) if e.is_input() => S::Fired,
        (S::Fired, E::GateBlocked) => S::Suppressed,
        (S::Fired, E::GateOpen) => S::Shown,
        (S::Shown, e) if e.is_input() => S::Shown,
        (S::Shown, E::FetchEmpty | E::FetchFailed) => S::Suppressed,
        (S::Shown, E::Rendered) => S::Shown,
        (S::Shown, E::Closed) => S::Closed,
        (S::Suppressed, _) => S::Suppressed,
        (S::Closed, _) => S::Closed,
        (from, e) => {
            return Err(WidgetError::InvalidTransition {
                from: from.as_str(),
                event: e.as_str(),
            })
        }
    };
    Ok(next)
}

// ---------------------------------------------------------------------------
// TriggerMachine
// ---------------------------------------------------------------------------

/// Activation-scoped trigger state.
#[derive(Debug, Clone)]
pub struct TriggerMachine {
    state: TriggerState,
    policy: TriggerPolicy,
    exit_listener_attached: bool,
}

impl TriggerMachine {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            state: TriggerState::Waiting,
            policy,
            exit_listener_attached: policy.kind == TriggerKind::ExitIntent,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn exit_listener_attached(&self) -> bool {
        self.exit_listener_attached
    }

    /// Whether host-page input still matters. Listeners check this before
    /// doing any work of their own.
    pub fn is_armed(&self) -> bool {
        self.state == TriggerState::Waiting
    }

    /// Feed a host-page input. Returns `true` only on the transition into
    /// `Fired`.
    pub fn on_input(&mut self, event: TriggerEvent) -> bool {
        if !self.is_armed() || !event.is_input() {
            return false;
        }
        if event_is_exit(&event) && !self.exit_listener_attached {
            return false;
        }

        match transition(self.state, &event, &self.policy) {
            Ok(TriggerState::Fired) => {
                self.state = TriggerState::Fired;
                if self.policy.kind == TriggerKind::ExitIntent && self.policy.show_once {
                    self.exit_listener_attached = false;
                }
                tracing::debug!(event = event.as_str(), "Popup trigger fired");
                true
            }
            _ => false,
        }
    }

    /// Apply a lifecycle event (gate, fetch, close).
    pub fn apply(&mut self, event: TriggerEvent) -> Result<TriggerState, WidgetError> {
        let next = transition(self.state, &event, &self.policy)?;
        self.state = next;
        Ok(next)
    }
}

fn event_is_exit(event: &TriggerEvent) -> bool {
    matches!(event, TriggerEvent::PointerLeft { .. })
}

/// Vertical scroll fraction for a document.
///
/// A document that cannot scroll counts as fully scrolled.
pub fn scroll_fraction(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 1.0;
    }
    (scroll_top / scrollable).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn policy(kind: TriggerKind) -> TriggerPolicy {
        TriggerPolicy {
            kind,
            scroll_threshold: 0.8,
            show_once: true,
        }
    }

    #[test]
    fn time_trigger_fires_once() {
        let mut m = TriggerMachine::new(policy(TriggerKind::Time));
        assert!(m.on_input(TriggerEvent::DelayElapsed));
        assert!(!m.on_input(TriggerEvent::DelayElapsed));
        assert_eq!(m.state(), TriggerState::Fired);
    }

    #[test]
    fn scroll_trigger_fires_only_after_threshold() {
        let mut m = TriggerMachine::new(policy(TriggerKind::Scroll));
        assert!(!m.on_input(TriggerEvent::Scrolled { fraction: 0.79 }));
        assert_eq!(m.state(), TriggerState::Waiting);
        assert!(m.on_input(TriggerEvent::Scrolled { fraction: 0.81 }));
        assert!(!m.on_input(TriggerEvent::Scrolled { fraction: 0.95 }));
        assert_eq!(m.state(), TriggerState::Fired);
    }

    #[test]
    fn exit_intent_requires_top_edge_exit() {
        let mut m = TriggerMachine::new(policy(TriggerKind::ExitIntent));
        assert!(!m.on_input(TriggerEvent::PointerLeft {
            client_y: 300.0,
            leaving_document: true
        }));
        assert!(!m.on_input(TriggerEvent::PointerLeft {
            client_y: -2.0,
            leaving_document: false
        }));
        assert!(m.exit_listener_attached());
        assert!(m.on_input(TriggerEvent::PointerLeft {
            client_y: -2.0,
            leaving_document: true
        }));
        assert!(!m.exit_listener_attached());
    }

    #[test]
    fn exit_listener_stays_without_show_once() {
        let mut m = TriggerMachine::new(TriggerPolicy {
            show_once: false,
            ..policy(TriggerKind::ExitIntent)
        });
        assert!(m.on_input(TriggerEvent::PointerLeft {
            client_y: 0.0,
            leaving_document: true
        }));
        assert!(m.exit_listener_attached());
    }

    #[test]
    fn wrong_kind_input_is_ignored() {
        let mut m = TriggerMachine::new(policy(TriggerKind::Scroll));
        assert!(!m.on_input(TriggerEvent::DelayElapsed));
        assert_eq!(m.state(), TriggerState::Waiting);
    }

    #[test]
    fn gate_blocked_suppresses() {
        let mut m = TriggerMachine::new(policy(TriggerKind::Time));
        m.on_input(TriggerEvent::DelayElapsed);
        assert_eq!(m.apply(TriggerEvent::GateBlocked).unwrap(), TriggerState::Suppressed);
        assert!(!m.on_input(TriggerEvent::DelayElapsed));
    }

    #[test]
    fn full_show_and_close_cycle() {
        let mut m = TriggerMachine::new(policy(TriggerKind::Time));
        m.on_input(TriggerEvent::DelayElapsed);
        assert_eq!(m.apply(TriggerEvent::GateOpen).unwrap(), TriggerState::Shown);
        assert_eq!(m.apply(TriggerEvent::Rendered).unwrap(), TriggerState::Shown);
        assert_eq!(m.apply(TriggerEvent::Closed).unwrap(), TriggerState::Closed);
        assert!(!m.on_input(TriggerEvent::DelayElapsed));
        assert_eq!(m.state(), TriggerState::Closed);
    }

    #[test]
    fn failed_fetch_suppresses() {
        for failure in [TriggerEvent::FetchEmpty, TriggerEvent::FetchFailed] {
            let mut m = TriggerMachine::new(policy(TriggerKind::Time));
            m.on_input(TriggerEvent::DelayElapsed);
            m.apply(TriggerEvent::GateOpen).unwrap();
            assert_eq!(m.apply(failure).unwrap(), TriggerState::Suppressed);
        }
    }

    #[test]
    fn lifecycle_event_while_waiting_is_invalid() {
        let p = policy(TriggerKind::Time);
        assert_matches!(
            transition(TriggerState::Waiting, &TriggerEvent::GateOpen, &p),
            Err(WidgetError::InvalidTransition { from: "waiting", event: "gate_open" })
        );
        assert_matches!(
            transition(TriggerState::Fired, &TriggerEvent::Closed, &p),
            Err(WidgetError::InvalidTransition { .. })
        );
    }

    #[test]
    fn terminal_states_absorb_everything() {
        let p = policy(TriggerKind::Time);
        for state in [TriggerState::Suppressed, TriggerState::Closed] {
            for event in [
                TriggerEvent::DelayElapsed,
                TriggerEvent::GateOpen,
                TriggerEvent::Rendered,
                TriggerEvent::Closed,
            ] {
                assert_eq!(transition(state, &event, &p).unwrap(), state);
            }
        }
    }

    #[test]
    fn scroll_fraction_math() {
        assert!((scroll_fraction(500.0, 1500.0, 500.0) - 0.5).abs() < 1e-9);
        assert_eq!(scroll_fraction(0.0, 400.0, 800.0), 1.0);
        assert_eq!(scroll_fraction(5000.0, 1500.0, 500.0), 1.0);
    }
}
