//! Document - High-level document API

use crate::{DomResult, DomTree, NodeId};

/// Popover visibility is modeled as a custom state on elements that carry
/// the `popover` attribute.
pub const POPOVER_OPEN_STATE: &str = "popover-open";

/// HTML Document
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with the html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Skeleton construction is not an observable mutation.
        let root = tree.root();
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);
        tree.clear_mutations();

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Wrap a parsed tree; caches are filled by [`Document::finalize`]
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        let mut doc = Self {
            tree,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        doc.finalize();
        doc
    }

    /// Locate html/head/body and quiesce the journal after a bulk parse
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        for (id, node) in self.tree.children(root) {
            if node.as_element().is_some_and(|e| e.tag_name == "html") {
                self.html_element = id;
            }
        }
        if self.html_element.is_valid() {
            for (id, node) in self.tree.children(self.html_element) {
                if let Some(elem) = node.as_element() {
                    match elem.tag_name.as_str() {
                        "head" => self.head_element = id,
                        "body" => self.body_element = id,
                        _ => {}
                    }
                }
            }
        }
        self.tree.clear_mutations();
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the document URL (after a committed navigation)
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        for (id, node) in self.tree.children(self.head_element) {
            if node.as_element().is_some_and(|e| e.tag_name == "title") {
                return self.tree.text_content(id);
            }
        }
        String::new()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.element_by_id(id)
    }

    /// Mark a popover element as shown
    pub fn show_popover(&mut self, node: NodeId) -> DomResult<()> {
        self.tree.set_state(node, POPOVER_OPEN_STATE, true)
    }

    /// Mark a popover element as hidden
    pub fn hide_popover(&mut self, node: NodeId) -> DomResult<()> {
        self.tree.set_state(node, POPOVER_OPEN_STATE, false)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert!(doc.document_element().is_valid());
        assert!(doc.head().is_valid());
        assert!(doc.body().is_valid());
        assert!(!doc.tree().has_pending_mutations());
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new("about:blank");
        let body = doc.body();
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(div, "id", "people").unwrap();
        doc.tree_mut().append_child(body, div).unwrap();

        assert_eq!(doc.get_element_by_id("people"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_popover_state() {
        let mut doc = Document::new("about:blank");
        let body = doc.body();
        let pop = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(pop, "popover", "").unwrap();
        doc.tree_mut().append_child(body, pop).unwrap();

        doc.show_popover(pop).unwrap();
        assert!(doc.tree().has_state(pop, POPOVER_OPEN_STATE));
        doc.hide_popover(pop).unwrap();
        assert!(!doc.tree().has_state(pop, POPOVER_OPEN_STATE));
    }
}
