//! In-memory model of the host page the widget is mounted into.
//!
//! The runtime only ever does a handful of things to a page: add a style
//! sheet to head, append root nodes to body, toggle classes, replace the
//! children of a node and remove a node. [`HostDocument`] supports exactly
//! those and counts every mutation so callers can assert that an aborted
//! activation left the page untouched.
//!
//! Lookups of ids that are not mounted are not errors: they are logged at
//! debug level and reported as `false` / `None`.

use std::fmt::Write as _;
use std::sync::Arc;

use proofwall_core::markup::{Element, Node};
use tokio::sync::Mutex;

/// Document shared between the shells and their scheduled tasks.
pub type SharedDocument = Arc<Mutex<HostDocument>>;

#[derive(Debug, Default)]
pub struct HostDocument {
    /// `(id, css)` pairs in insertion order.
    styles: Vec<(String, String)>,
    body: Vec<Element>,
    mutations: usize,
}

impl HostDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh empty document behind a shared handle.
    pub fn shared() -> SharedDocument {
        Arc::new(Mutex::new(Self::new()))
    }

    // ---- head ----

    pub fn has_style(&self, id: &str) -> bool {
        self.styles.iter().any(|(sid, _)| sid == id)
    }

    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(sid, _)| sid == id)
            .map(|(_, css)| css.as_str())
    }

    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Append a `<style>` element. Returns `false` if one with `id` exists.
    pub fn append_style(&mut self, id: &str, css: String) -> bool {
        if self.has_style(id) {
            return false;
        }
        self.styles.push((id.to_string(), css));
        self.mutations += 1;
        true
    }

    // ---- body ----

    /// Append a root node to body.
    pub fn mount(&mut self, element: Element) {
        self.body.push(element);
        self.mutations += 1;
    }

    /// Remove the node with `id`, wherever it is mounted.
    pub fn unmount(&mut self, id: &str) -> Option<Element> {
        let removed = match self.body.iter().position(|el| el.id() == Some(id)) {
            Some(pos) => Some(self.body.remove(pos)),
            None => self.body.iter_mut().find_map(|el| el.remove_descendant(id)),
        };
        match removed {
            Some(el) => {
                self.mutations += 1;
                Some(el)
            }
            None => {
                tracing::debug!(id, "Unmount target not found");
                None
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        self.body.iter().find_map(|el| el.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Whether `target` is `ancestor` itself or mounted inside it.
    pub fn is_within(&self, ancestor: &str, target: &str) -> bool {
        self.find(ancestor)
            .is_some_and(|el| el.find(target).is_some())
    }

    /// Toggle a class on a mounted node. Returns `false` if the node is
    /// missing or already in the requested state.
    pub fn set_class(&mut self, id: &str, class: &str, on: bool) -> bool {
        let Some(el) = self.find_mut(id) else {
            tracing::debug!(id, class, "Class target not found");
            return false;
        };
        let changed = el.set_class(class, on);
        if changed {
            self.mutations += 1;
        }
        changed
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.find(id).is_some_and(|el| el.has_class(class))
    }

    /// Replace all children of a mounted node.
    pub fn replace_children(&mut self, id: &str, children: Vec<Node>) -> bool {
        let Some(el) = self.find_mut(id) else {
            tracing::debug!(id, "Replace target not found");
            return false;
        };
        el.replace_children(children);
        self.mutations += 1;
        true
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.iter_mut().find_map(|el| el.find_mut(id))
    }

    // ---- inspection ----

    /// Number of mutations applied since creation.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Whether nothing was ever added, removed or changed.
    pub fn is_pristine(&self) -> bool {
        self.mutations == 0
    }

    pub fn body(&self) -> &[Element] {
        &self.body
    }

    /// All mounted nodes carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.body
            .iter()
            .flat_map(|el| el.find_by_class(class))
            .collect()
    }

    /// Serialize the page as a standalone HTML document.
    pub fn render_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        for (id, css) in &self.styles {
            let _ = writeln!(out, "<style id=\"{id}\">{css}</style>");
        }
        out.push_str("</head>\n<body>\n");
        for el in &self.body {
            out.push_str(&el.render());
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}
