//! Testimonial card rendering.
//!
//! [`render_card`] is a pure function of its inputs: the same testimonial
//! and theme always produce an equal [`Element`].

use crate::config::Theme;
use crate::markup::Element;
use crate::testimonial::{SubmissionType, Testimonial};

/// Number of glyphs in every rating row.
pub const MAX_STARS: usize = 5;

pub const STAR_FILLED: &str = "\u{2605}";
pub const STAR_EMPTY: &str = "\u{2606}";

/// Build the card fragment for one testimonial.
pub fn render_card(t: &Testimonial, theme: Theme) -> Element {
    let mut card = Element::new("div")
        .class("pw-card")
        .class(format!("pw-card-{}", theme.as_str()))
        .attr("data-testimonial-id", t.id.as_str());

    if let Some(media) = media_block(t) {
        card = card.child(media);
    }

    if let Some(rating) = t.rating {
        card = card.child(star_row(rating));
    }

    if let Some(body) = non_blank(t.testimonial.as_deref()) {
        card = card.child(Element::new("p").class("pw-text").text(body));
    }

    card.child(author_block(t))
}

/// A row of exactly [`MAX_STARS`] glyphs, the first `rating` filled.
///
/// Ratings outside `0..=5` are clamped.
pub fn star_row(rating: i32) -> Element {
    let filled = rating.clamp(0, MAX_STARS as i32) as usize;
    let stars = (0..MAX_STARS).map(|i| {
        if i < filled {
            Element::new("span")
                .class("pw-star")
                .class("pw-star-filled")
                .text(STAR_FILLED)
        } else {
            Element::new("span")
                .class("pw-star")
                .class("pw-star-empty")
                .text(STAR_EMPTY)
        }
    });

    Element::new("div")
        .class("pw-stars")
        .attr("aria-label", format!("{filled} out of {MAX_STARS} stars"))
        .children(stars)
}

/// Upper-cased first letters of the first two whitespace-separated tokens.
///
/// A blank name yields an empty string.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// `"{role} at {company}"`, or whichever of the two is present.
pub fn role_line(role: Option<&str>, company: Option<&str>) -> Option<String> {
    match (non_blank(role), non_blank(company)) {
        (Some(role), Some(company)) => Some(format!("{role} at {company}")),
        (Some(role), None) => Some(role.to_string()),
        (None, Some(company)) => Some(company.to_string()),
        (None, None) => None,
    }
}

fn media_block(t: &Testimonial) -> Option<Element> {
    match t.submission_type {
        SubmissionType::Video => {
            let url = non_blank(t.video_url.as_deref())?;
            Some(
                Element::new("div").class("pw-media").child(
                    Element::new("video")
                        .class("pw-video")
                        .attr("controls", "")
                        .attr("preload", "metadata")
                        .attr("playsinline", "")
                        .child(Element::new("source").attr("src", url)),
                ),
            )
        }
        SubmissionType::Screenshot => {
            let url = non_blank(t.photo_url.as_deref())?;
            Some(
                Element::new("div").class("pw-media").child(
                    Element::new("img")
                        .class("pw-screenshot")
                        .attr("src", url)
                        .attr("alt", format!("Testimonial from {}", t.name))
                        .attr("loading", "lazy"),
                ),
            )
        }
        SubmissionType::Text => None,
    }
}

fn author_block(t: &Testimonial) -> Element {
    let photo = non_blank(t.photo_url.as_deref())
        .filter(|_| t.submission_type != SubmissionType::Screenshot);

    let avatar = match photo {
        Some(url) => Element::new("img")
            .class("pw-avatar")
            .attr("src", url)
            .attr("alt", t.name.as_str())
            .attr("loading", "lazy"),
        None => Element::new("div")
            .class("pw-avatar")
            .class("pw-avatar-initials")
            .text(initials(&t.name)),
    };

    let mut info = Element::new("div")
        .class("pw-author-info")
        .child(Element::new("div").class("pw-name").text(t.name.trim()));
    if let Some(line) = role_line(t.role.as_deref(), t.company.as_deref()) {
        info = info.child(Element::new("div").class("pw-role").text(line));
    }

    Element::new("div")
        .class("pw-author")
        .child(avatar)
        .child(info)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
