//! Process configuration for the `proofwall-preview` binary.

use std::path::PathBuf;
use std::time::Duration;

use proofwall_core::ScriptAttributes;

const DEFAULT_SCRIPT_SRC: &str = "https://www.proofwall.io/widget.js";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreviewConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which presentation shell the preview drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Floating,
    Popup,
}

impl Variant {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "floating" => Some(Self::Floating),
            "popup" => Some(Self::Popup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Floating => "floating",
            Self::Popup => "popup",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// URL the widget script is pretended to be loaded from.
    pub script_src: String,
    pub attributes: ScriptAttributes,
    pub variant: Variant,
    pub fetch_timeout: Duration,
    /// Serve this endpoint body instead of calling the API.
    pub fixture: Option<PathBuf>,
    /// Persist popup flags here instead of in memory.
    pub flag_store: Option<PathBuf>,
}

impl PreviewConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                        | Required | Default                              |
    /// |--------------------------------|----------|--------------------------------------|
    /// | `PROOFWALL_ATTRIBUTES`         | yes      | --  (`data-workspace=ws1;data-theme=dark`) |
    /// | `PROOFWALL_SCRIPT_SRC`         | no       | `https://www.proofwall.io/widget.js` |
    /// | `PROOFWALL_VARIANT`            | no       | `floating`                           |
    /// | `PROOFWALL_FETCH_TIMEOUT_SECS` | no       | `10`                                 |
    /// | `PROOFWALL_FIXTURE`            | no       | unset (live API)                     |
    /// | `PROOFWALL_FLAG_STORE`         | no       | unset (in-memory)                    |
    pub fn from_env() -> Result<Self, PreviewConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, PreviewConfigError> {
        let attributes = lookup("PROOFWALL_ATTRIBUTES")
            .filter(|v| !v.trim().is_empty())
            .map(|v| ScriptAttributes::parse(&v))
            .ok_or(PreviewConfigError::Missing("PROOFWALL_ATTRIBUTES"))?;

        let script_src =
            lookup("PROOFWALL_SCRIPT_SRC").unwrap_or_else(|| DEFAULT_SCRIPT_SRC.into());

        let variant = match lookup("PROOFWALL_VARIANT") {
            None => Variant::Floating,
            Some(v) => Variant::from_str(v.trim()).ok_or(PreviewConfigError::Invalid {
                name: "PROOFWALL_VARIANT",
                value: v,
            })?,
        };

        let fetch_timeout_secs = match lookup("PROOFWALL_FETCH_TIMEOUT_SECS") {
            None => DEFAULT_FETCH_TIMEOUT_SECS,
            Some(v) => v.trim().parse::<u64>().map_err(|_| PreviewConfigError::Invalid {
                name: "PROOFWALL_FETCH_TIMEOUT_SECS",
                value: v,
            })?,
        };

        Ok(Self {
            script_src,
            attributes,
            variant,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            fixture: lookup("PROOFWALL_FIXTURE").map(PathBuf::from),
            flag_store: lookup("PROOFWALL_FLAG_STORE").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&'static str, &str)]) -> Result<PreviewConfig, PreviewConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        PreviewConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("PROOFWALL_ATTRIBUTES", "data-workspace=ws1")]).unwrap();
        assert_eq!(config.attributes.get("data-workspace"), Some("ws1"));
        assert_eq!(config.script_src, DEFAULT_SCRIPT_SRC);
        assert_eq!(config.variant, Variant::Floating);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.fixture.is_none());
    }

    #[test]
    fn attributes_are_required() {
        assert_eq!(
            load(&[]).unwrap_err(),
            PreviewConfigError::Missing("PROOFWALL_ATTRIBUTES")
        );
    }

    #[test]
    fn invalid_values_rejected() {
        assert_matches!(
            load(&[
                ("PROOFWALL_ATTRIBUTES", "data-workspace=ws1"),
                ("PROOFWALL_VARIANT", "sidebar"),
            ]),
            Err(PreviewConfigError::Invalid { name: "PROOFWALL_VARIANT", .. })
        );
        assert_matches!(
            load(&[
                ("PROOFWALL_ATTRIBUTES", "data-workspace=ws1"),
                ("PROOFWALL_FETCH_TIMEOUT_SECS", "soon"),
            ]),
            Err(PreviewConfigError::Invalid { name: "PROOFWALL_FETCH_TIMEOUT_SECS", .. })
        );
    }

    #[test]
    fn popup_variant_with_fixture() {
        let config = load(&[
            ("PROOFWALL_ATTRIBUTES", "data-workspace=ws1"),
            ("PROOFWALL_VARIANT", "popup"),
            ("PROOFWALL_FIXTURE", "fixtures/ws1.json"),
        ])
        .unwrap();
        assert_eq!(config.variant, Variant::Popup);
        assert_eq!(config.fixture, Some(PathBuf::from("fixtures/ws1.json")));
    }
}
