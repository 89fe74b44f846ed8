//! "Show at most once" persistence gate for the popup.
//!
//! One durable key per workspace records that the popup was shown on this
//! device. The key is only ever written, never cleared; clearing is left to
//! the end user's own storage controls.

use std::collections::HashMap;

/// Key prefix of the per-workspace shown flag.
pub const SHOWN_KEY_PREFIX: &str = "proofwall_popup_shown_";

/// Value written when the popup has been shown.
pub const SHOWN_VALUE: &str = "true";

/// Durable string key/value storage scoped to the device.
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value. Failures are logged by the implementation and
    /// reported as `false`; the gate never aborts display because of them.
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// In-process store; contents last as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, String>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.values.insert(key.to_string(), value.to_string());
        true
    }
}

/// Gate for one workspace's popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceGate {
    key: String,
}

impl PersistenceGate {
    pub fn for_workspace(workspace_id: &str) -> Self {
        Self {
            key: format!("{SHOWN_KEY_PREFIX}{workspace_id}"),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether display must be suppressed: show-once is on and the flag is set.
    pub fn is_blocked(&self, show_once: bool, store: &dyn FlagStore) -> bool {
        show_once && store.get(&self.key).as_deref() == Some(SHOWN_VALUE)
    }

    pub fn mark_shown(&self, store: &mut dyn FlagStore) -> bool {
        let written = store.set(&self.key, SHOWN_VALUE);
        if !written {
            tracing::warn!(key = %self.key, "Failed to persist popup shown flag");
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_per_workspace() {
        assert_eq!(
            PersistenceGate::for_workspace("ws1").key(),
            "proofwall_popup_shown_ws1"
        );
        assert_ne!(
            PersistenceGate::for_workspace("a"),
            PersistenceGate::for_workspace("b")
        );
    }

    #[test]
    fn blocks_only_after_mark_and_with_show_once() {
        let gate = PersistenceGate::for_workspace("ws1");
        let mut store = MemoryFlagStore::new();
        assert!(!gate.is_blocked(true, &store));

        assert!(gate.mark_shown(&mut store));
        assert!(gate.is_blocked(true, &store));
        assert!(!gate.is_blocked(false, &store));
    }

    #[test]
    fn other_workspace_not_blocked() {
        let mut store = MemoryFlagStore::new();
        PersistenceGate::for_workspace("ws1").mark_shown(&mut store);
        assert!(!PersistenceGate::for_workspace("ws2").is_blocked(true, &store));
    }
}
