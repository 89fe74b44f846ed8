//! Script-attribute parsing and widget configuration defaults.
//!
//! The host page configures the widget exclusively through `data-*`
//! attributes on the `<script>` tag. [`resolve_config`] turns those
//! attributes into a fully-defaulted [`WidgetConfig`]. Only a missing
//! workspace id is an error; every other malformed value falls back to
//! its default without complaint.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

pub const ATTR_WORKSPACE: &str = "data-workspace";
pub const ATTR_THEME: &str = "data-theme";
pub const ATTR_POSITION: &str = "data-position";
pub const ATTR_TEXT: &str = "data-text";
pub const ATTR_ICON: &str = "data-icon";
pub const ATTR_LAYOUT: &str = "data-layout";
pub const ATTR_MARQUEE_SPEED: &str = "data-marquee-speed";
pub const ATTR_AUTO_ROTATE: &str = "data-auto-rotate";
pub const ATTR_TRIGGER: &str = "data-trigger";
pub const ATTR_DELAY: &str = "data-delay";
pub const ATTR_SHOW_ONCE: &str = "data-show-once";
pub const ATTR_SCROLL_PERCENT: &str = "data-scroll-percent";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Delay before a time-triggered popup fires.
pub const DEFAULT_DELAY_MS: u64 = 5000;

/// Scroll depth (percent of scrollable height) that fires a scroll trigger.
pub const DEFAULT_SCROLL_PERCENT: u8 = 50;

/// Seconds for one full marquee cycle.
pub const DEFAULT_MARQUEE_SPEED_SECS: u64 = 50;

/// Spotlight rotation period.
pub const DEFAULT_AUTO_ROTATE_MS: u64 = 5000;

pub const DEFAULT_LAUNCHER_TEXT: &str = "Testimonials";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Colour scheme of every widget surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Viewport corner the floating launcher is pinned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim() {
            "bottom-right" => Some(Self::BottomRight),
            "bottom-left" => Some(Self::BottomLeft),
            "top-right" => Some(Self::TopRight),
            "top-left" => Some(Self::TopLeft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
        }
    }

    /// CSS `(vertical, horizontal)` offset properties for this corner.
    pub fn css_edges(&self) -> (&'static str, &'static str) {
        match self {
            Self::BottomRight => ("bottom", "right"),
            Self::BottomLeft => ("bottom", "left"),
            Self::TopRight => ("top", "right"),
            Self::TopLeft => ("top", "left"),
        }
    }
}

/// Condition that fires the popup variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    Time,
    ExitIntent,
    Scroll,
}

impl TriggerKind {
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim() {
            "time" => Some(Self::Time),
            "exit_intent" => Some(Self::ExitIntent),
            "scroll" => Some(Self::Scroll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::ExitIntent => "exit_intent",
            Self::Scroll => "scroll",
        }
    }
}

/// Card arrangement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Grid,
    List,
    Carousel,
    Marquee,
    Masonry,
    Spotlight,
}

impl LayoutKind {
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim() {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            "carousel" => Some(Self::Carousel),
            "marquee" => Some(Self::Marquee),
            "masonry" => Some(Self::Masonry),
            "spotlight" => Some(Self::Spotlight),
            _ => None,
        }
    }

    /// Unknown layout names select the grid.
    pub fn from_attr_or_default(s: &str) -> Self {
        Self::from_attr(s).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Carousel => "carousel",
            Self::Marquee => "marquee",
            Self::Masonry => "masonry",
            Self::Spotlight => "spotlight",
        }
    }
}

/// Glyph shown on the floating launcher button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LauncherIcon {
    #[default]
    Star,
    Chat,
    Heart,
}

impl LauncherIcon {
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim() {
            "star" => Some(Self::Star),
            "chat" => Some(Self::Chat),
            "heart" => Some(Self::Heart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Chat => "chat",
            Self::Heart => "heart",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Star => "\u{2605}",
            Self::Chat => "\u{1F4AC}",
            Self::Heart => "\u{2665}",
        }
    }
}

// ---------------------------------------------------------------------------
// Script attributes
// ---------------------------------------------------------------------------

/// The `data-*` attributes read off the widget's `<script>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAttributes {
    values: BTreeMap<String, String>,
}

impl ScriptAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Parse `name=value` pairs separated by `;`.
    ///
    /// Entries without `=` are ignored; surrounding whitespace and matching
    /// quotes around values are stripped.
    pub fn parse(raw: &str) -> Self {
        let values = raw
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                let value = value.trim().trim_matches('"').trim_matches('\'');
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn parse_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(|v| v.trim().parse::<u64>().ok())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScriptAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetConfig
// ---------------------------------------------------------------------------

/// Fully-defaulted configuration of one widget activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub workspace_id: String,
    pub theme: Theme,
    pub position: Position,
    pub trigger_kind: TriggerKind,
    pub delay_ms: u64,
    pub scroll_percent: u8,
    pub show_once: bool,
    pub layout: LayoutKind,
    pub marquee_speed_secs: u64,
    pub auto_rotate_ms: u64,
    pub launcher_text: String,
    pub launcher_icon: LauncherIcon,
}

impl WidgetConfig {
    /// A configuration with every optional field at its default.
    pub fn with_defaults(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            theme: Theme::default(),
            position: Position::default(),
            trigger_kind: TriggerKind::default(),
            delay_ms: DEFAULT_DELAY_MS,
            scroll_percent: DEFAULT_SCROLL_PERCENT,
            show_once: true,
            layout: LayoutKind::default(),
            marquee_speed_secs: DEFAULT_MARQUEE_SPEED_SECS,
            auto_rotate_ms: DEFAULT_AUTO_ROTATE_MS,
            launcher_text: DEFAULT_LAUNCHER_TEXT.to_string(),
            launcher_icon: LauncherIcon::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn auto_rotate(&self) -> Duration {
        Duration::from_millis(self.auto_rotate_ms)
    }

    /// Scroll threshold as a fraction in `0.0..=1.0`.
    pub fn scroll_threshold(&self) -> f64 {
        f64::from(self.scroll_percent) / 100.0
    }
}

/// Resolve script attributes into a [`WidgetConfig`].
///
/// Fails only when `data-workspace` is absent or blank.
pub fn resolve_config(attrs: &ScriptAttributes) -> Result<WidgetConfig, WidgetError> {
    let workspace_id = attrs
        .get(ATTR_WORKSPACE)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            WidgetError::Configuration(format!("missing required attribute '{ATTR_WORKSPACE}'"))
        })?;

    let mut config = WidgetConfig::with_defaults(workspace_id);

    if let Some(theme) = attrs.get(ATTR_THEME).and_then(Theme::from_attr) {
        config.theme = theme;
    }
    if let Some(position) = attrs.get(ATTR_POSITION).and_then(Position::from_attr) {
        config.position = position;
    }
    if let Some(kind) = attrs.get(ATTR_TRIGGER).and_then(TriggerKind::from_attr) {
        config.trigger_kind = kind;
    }
    if let Some(layout) = attrs.get(ATTR_LAYOUT) {
        config.layout = LayoutKind::from_attr_or_default(layout);
    }
    if let Some(icon) = attrs.get(ATTR_ICON).and_then(LauncherIcon::from_attr) {
        config.launcher_icon = icon;
    }
    if let Some(text) = attrs.get(ATTR_TEXT).map(str::trim).filter(|t| !t.is_empty()) {
        config.launcher_text = text.to_string();
    }
    if let Some(delay) = attrs.parse_u64(ATTR_DELAY) {
        config.delay_ms = delay;
    }
    if let Some(percent) = attrs.parse_u64(ATTR_SCROLL_PERCENT) {
        config.scroll_percent = percent.min(100) as u8;
    }
    if let Some(speed) = attrs.parse_u64(ATTR_MARQUEE_SPEED).filter(|s| *s > 0) {
        config.marquee_speed_secs = speed;
    }
    if let Some(period) = attrs.parse_u64(ATTR_AUTO_ROTATE).filter(|p| *p > 0) {
        config.auto_rotate_ms = period;
    }
    if let Some(flag) = attrs.get(ATTR_SHOW_ONCE) {
        config.show_once = flag.trim() != "false";
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
