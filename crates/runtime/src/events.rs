//! Host-page input delivered to the shells.
//!
//! The embedding layer translates DOM events into [`HostEvent`]s. Click
//! targets are identified by the id of the nearest element that has one,
//! or `None` for host-page elements without an id.

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Click { target: Option<String> },
    KeyDown { key: String },
    Scroll {
        scroll_top: f64,
        scroll_height: f64,
        viewport_height: f64,
    },
    /// `mouseout` on the document; `leaving_document` when the pointer
    /// moved to no element.
    PointerOut { client_y: f64, leaving_document: bool },
}

impl HostEvent {
    pub fn click(target: &str) -> Self {
        Self::Click {
            target: Some(target.to_string()),
        }
    }

    /// A click on host-page content outside any widget element.
    pub fn click_outside() -> Self {
        Self::Click { target: None }
    }

    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
        }
    }

    /// A scroll to `percent` of a 1000px-scrollable page.
    pub fn scroll_to_percent(percent: f64) -> Self {
        Self::Scroll {
            scroll_top: percent * 10.0,
            scroll_height: 1800.0,
            viewport_height: 800.0,
        }
    }

    pub fn is_escape(&self) -> bool {
        matches!(self, Self::KeyDown { key } if key == "Escape")
    }

    pub fn click_target(&self) -> Option<&str> {
        match self {
            Self::Click { target } => target.as_deref(),
            _ => None,
        }
    }
}
