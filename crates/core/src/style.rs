//! Scoped stylesheet for the widget.
//!
//! Every selector starts with the private `pw-` prefix and the root
//! containers reset inherited properties, so host-page CSS neither leaks
//! into the widget nor gets overridden by it.

use std::fmt::Write as _;

use crate::config::{Theme, WidgetConfig};

/// Id of the `<style>` element; used to detect a second injection.
pub const STYLE_ELEMENT_ID: &str = "pw-widget-styles";

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub star: &'static str,
    pub overlay: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#ffffff",
                surface: "#f9fafb",
                text: "#111827",
                muted: "#6b7280",
                border: "#e5e7eb",
                accent: "#4f46e5",
                star: "#f59e0b",
                overlay: "rgba(17, 24, 39, 0.55)",
            },
            Theme::Dark => Self {
                background: "#111827",
                surface: "#1f2937",
                text: "#f9fafb",
                muted: "#9ca3af",
                border: "#374151",
                accent: "#818cf8",
                star: "#fbbf24",
                overlay: "rgba(0, 0, 0, 0.7)",
            },
        }
    }
}

/// Rules that do not depend on configuration.
const BASE_RULES: &str = r#"
.pw-root, .pw-popup-overlay { all: initial; box-sizing: border-box; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; font-size: 14px; line-height: 1.5; }
.pw-root *, .pw-popup-overlay * { box-sizing: border-box; margin: 0; padding: 0; }
.pw-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 12px; }
.pw-list { display: flex; flex-direction: column; gap: 12px; }
.pw-carousel { position: relative; }
.pw-carousel-track { display: flex; gap: 12px; overflow-x: auto; scroll-snap-type: x mandatory; scroll-behavior: smooth; }
.pw-carousel-slide { flex: 0 0 85%; scroll-snap-align: start; }
.pw-marquee { overflow: hidden; }
.pw-marquee-track { display: flex; gap: 12px; width: max-content; animation-name: pw-marquee-scroll; animation-timing-function: linear; animation-iteration-count: infinite; }
.pw-marquee:hover .pw-marquee-track { animation-play-state: paused; }
.pw-marquee-track .pw-card { width: 280px; flex-shrink: 0; }
@keyframes pw-marquee-scroll { from { transform: translateX(0); } to { transform: translateX(-50%); } }
.pw-masonry { column-count: 2; column-gap: 12px; }
.pw-masonry-item { break-inside: avoid; margin-bottom: 12px; }
.pw-spotlight { position: relative; display: grid; }
.pw-spotlight-item { grid-area: 1 / 1; opacity: 0; pointer-events: none; transition: opacity 0.5s ease; }
.pw-spotlight-item.pw-active { opacity: 1; pointer-events: auto; }
.pw-card { border-radius: 12px; padding: 16px; display: flex; flex-direction: column; gap: 10px; }
.pw-media video, .pw-media img { width: 100%; border-radius: 8px; display: block; }
.pw-stars { display: flex; gap: 2px; font-size: 16px; }
.pw-author { display: flex; align-items: center; gap: 10px; }
.pw-avatar { width: 36px; height: 36px; border-radius: 50%; object-fit: cover; display: flex; align-items: center; justify-content: center; font-weight: 600; font-size: 13px; }
.pw-name { font-weight: 600; }
.pw-role { font-size: 12px; }
.pw-notice { padding: 24px; text-align: center; }
.pw-badge { margin-top: 12px; text-align: center; font-size: 11px; }
.pw-badge a { text-decoration: none; }
"#;

/// Build the complete stylesheet for one activation.
pub fn build_stylesheet(config: &WidgetConfig) -> String {
    let p = Palette::for_theme(config.theme);
    let (vertical, horizontal) = config.position.css_edges();
    let panel_offset = 76;

    let mut css = String::from(BASE_RULES);

    let _ = writeln!(
        css,
        ".pw-launcher {{ position: fixed; {vertical}: 20px; {horizontal}: 20px; z-index: 2147483646; \
         display: flex; align-items: center; gap: 8px; padding: 12px 18px; border: none; border-radius: 999px; \
         cursor: pointer; background: {accent}; color: #ffffff; font-weight: 600; box-shadow: 0 8px 24px rgba(0,0,0,0.18); }}",
        accent = p.accent,
    );
    let _ = writeln!(
        css,
        ".pw-panel {{ position: fixed; {vertical}: {panel_offset}px; {horizontal}: 20px; z-index: 2147483646; \
         width: 380px; max-width: calc(100vw - 40px); max-height: 70vh; overflow-y: auto; border-radius: 16px; \
         background: {bg}; color: {text}; border: 1px solid {border}; box-shadow: 0 16px 48px rgba(0,0,0,0.2); \
         transform: translateY(8px); opacity: 0; pointer-events: none; transition: opacity 0.2s ease, transform 0.2s ease; }}",
        bg = p.background,
        text = p.text,
        border = p.border,
    );
    let _ = writeln!(
        css,
        ".pw-panel.pw-open {{ opacity: 1; transform: translateY(0); pointer-events: auto; }}"
    );
    let _ = writeln!(
        css,
        ".pw-panel-header {{ display: flex; justify-content: space-between; align-items: center; \
         padding: 14px 16px; border-bottom: 1px solid {border}; font-weight: 600; }}",
        border = p.border,
    );
    let _ = writeln!(css, ".pw-panel-body {{ padding: 16px; }}");
    let _ = writeln!(
        css,
        ".pw-close {{ cursor: pointer; border: none; background: transparent; font-size: 20px; color: {muted}; }}",
        muted = p.muted,
    );
    let _ = writeln!(
        css,
        ".pw-popup-overlay {{ position: fixed; inset: 0; z-index: 2147483647; display: flex; \
         align-items: center; justify-content: center; background: {overlay}; }}",
        overlay = p.overlay,
    );
    let _ = writeln!(
        css,
        ".pw-popup-modal {{ position: relative; width: 640px; max-width: calc(100vw - 32px); max-height: 85vh; \
         overflow-y: auto; padding: 24px; border-radius: 16px; background: {bg}; color: {text}; }}",
        bg = p.background,
        text = p.text,
    );
    let _ = writeln!(
        css,
        ".pw-popup-modal .pw-close {{ position: absolute; top: 12px; right: 12px; }}"
    );
    let _ = writeln!(
        css,
        ".pw-card {{ background: {surface}; color: {text}; border: 1px solid {border}; }}",
        surface = p.surface,
        text = p.text,
        border = p.border,
    );
    let _ = writeln!(
        css,
        ".pw-star-filled {{ color: {star}; }} .pw-star-empty {{ color: {border}; }}",
        star = p.star,
        border = p.border,
    );
    let _ = writeln!(
        css,
        ".pw-avatar-initials {{ background: {accent}; color: #ffffff; }}",
        accent = p.accent,
    );
    let _ = writeln!(
        css,
        ".pw-role, .pw-notice, .pw-badge a {{ color: {muted}; }}",
        muted = p.muted,
    );
    let _ = writeln!(
        css,
        ".pw-marquee-track {{ animation-duration: {}s; }}",
        config.marquee_speed_secs
    );

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Position;

    /// Every selector (text before `{` on a rule line) must start with the
    /// private prefix or be a keyframes block.
    #[test]
    fn all_selectors_are_prefixed() {
        let css = build_stylesheet(&WidgetConfig::with_defaults("ws1"));
        for line in css.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let selector = line.split('{').next().unwrap_or_default();
            if selector.starts_with("@keyframes") {
                continue;
            }
            for part in selector.split(',') {
                assert!(
                    part.trim().starts_with(".pw-"),
                    "unscoped selector {part:?} in {line:?}"
                );
            }
        }
    }

    #[test]
    fn dark_theme_uses_dark_palette() {
        let mut config = WidgetConfig::with_defaults("ws1");
        config.theme = Theme::Dark;
        let css = build_stylesheet(&config);
        assert!(css.contains(Palette::for_theme(Theme::Dark).background));
        assert!(!css.contains(Palette::for_theme(Theme::Light).accent));
    }

    #[test]
    fn position_controls_launcher_corner() {
        let mut config = WidgetConfig::with_defaults("ws1");
        config.position = Position::TopLeft;
        let css = build_stylesheet(&config);
        assert!(css.contains(".pw-launcher { position: fixed; top: 20px; left: 20px;"));
    }

    #[test]
    fn marquee_speed_applied() {
        let mut config = WidgetConfig::with_defaults("ws1");
        config.marquee_speed_secs = 12;
        assert!(build_stylesheet(&config).contains("animation-duration: 12s"));
    }

    #[test]
    fn build_is_deterministic() {
        let config = WidgetConfig::with_defaults("ws1");
        assert_eq!(build_stylesheet(&config), build_stylesheet(&config));
    }
}
