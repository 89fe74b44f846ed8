//! Minimal markup tree used for every fragment the widget produces.
//!
//! Cards and layouts are built as [`Element`] trees by pure functions and
//! only become HTML in [`Element::render`]. Keeping the tree around (rather
//! than strings) lets the runtime toggle classes on mounted nodes and lets
//! tests inspect structure directly.

use std::fmt::Write as _;

/// Elements that never have a closing tag.
const VOID_TAGS: [&str; 4] = ["img", "source", "br", "meta"];

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Plain text; escaped on render.
    Text(String),
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An HTML element with an optional id, classes, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    // ---- builders ----

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    // ---- accessors ----

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Direct children that are elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }

    // ---- mutation ----

    /// Add or remove a class. Returns `true` if the class list changed.
    pub fn set_class(&mut self, class: &str, on: bool) -> bool {
        let present = self.has_class(class);
        match (present, on) {
            (false, true) => {
                self.classes.push(class.to_string());
                true
            }
            (true, false) => {
                self.classes.retain(|c| c != class);
                true
            }
            _ => false,
        }
    }

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    // ---- queries ----

    /// Depth-first search for an element with the given id (self included).
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|el| el.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(el) => el.find_mut(id),
            Node::Text(_) => None,
        })
    }

    /// All descendants (self included) carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for el in self.child_elements() {
            el.collect_by_class(class, found);
        }
    }

    /// Remove the first descendant with the given id. Returns it if found.
    pub fn remove_descendant(&mut self, id: &str) -> Option<Element> {
        let pos = self.children.iter().position(|n| match n {
            Node::Element(el) => el.id.as_deref() == Some(id),
            Node::Text(_) => false,
        });
        if let Some(pos) = pos {
            return match self.children.remove(pos) {
                Node::Element(el) => Some(el),
                Node::Text(_) => None,
            };
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(el) => el.remove_descendant(id),
            Node::Text(_) => None,
        })
    }

    // ---- rendering ----

    /// Serialize to HTML. Text and attribute values are escaped.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape_html(id));
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            if value.is_empty() {
                let _ = write!(out, " {name}");
            } else {
                let _ = write!(out, " {name}=\"{}\"", escape_html(value));
            }
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }

        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(&escape_html(t)),
                Node::Element(el) => el.render_into(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_nested_with_escaping() {
        let el = Element::new("div")
            .with_id("root")
            .class("a")
            .class("b")
            .attr("title", "x\"y")
            .child(Element::new("span").text("<b>hi</b> & bye"));
        assert_eq!(
            el.render(),
            r#"<div id="root" class="a b" title="x&quot;y"><span>&lt;b&gt;hi&lt;/b&gt; &amp; bye</span></div>"#
        );
    }

    #[test]
    fn void_and_boolean_attrs() {
        let el = Element::new("video")
            .attr("controls", "")
            .child(Element::new("source").attr("src", "a.mp4"));
        assert_eq!(el.render(), r#"<video controls><source src="a.mp4"></video>"#);
    }

    #[test]
    fn duplicate_class_ignored() {
        let el = Element::new("div").class("x").class("x");
        assert_eq!(el.classes(), ["x".to_string()]);
    }

    #[test]
    fn set_class_reports_change() {
        let mut el = Element::new("div");
        assert!(el.set_class("on", true));
        assert!(!el.set_class("on", true));
        assert!(el.set_class("on", false));
        assert!(!el.has_class("on"));
    }

    #[test]
    fn find_and_remove_by_id() {
        let mut el = Element::new("div").child(
            Element::new("ul")
                .child(Element::new("li").with_id("one"))
                .child(Element::new("li").with_id("two")),
        );
        assert!(el.find("two").is_some());
        if let Some(li) = el.find_mut("one") {
            li.set_class("picked", true);
        }
        assert!(el.find("one").is_some_and(|li| li.has_class("picked")));

        let removed = el.remove_descendant("two");
        assert!(removed.is_some());
        assert!(el.find("two").is_none());
        assert!(el.remove_descendant("missing").is_none());
    }

    #[test]
    fn text_content_concatenates() {
        let el = Element::new("p").text("a").child(Element::new("b").text("c"));
        assert_eq!(el.text_content(), "ac");
    }

    #[test]
    fn escape_plain_text_unchanged() {
        assert_eq!(escape_html("hello world"), "hello world");
    }
}
