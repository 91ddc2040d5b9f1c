//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use hview_dom::{Document, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        import_children(&dom.document, &mut tree, root);

        let document = Document::from_tree(tree, url);
        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an RcDom node into the arena tree, detached from any parent.
///
/// Returns `None` for node kinds the engine does not model.
pub(crate) fn import_node(handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
    let id = match &handle.data {
        RcNodeData::Document => return None,
        RcNodeData::Doctype {
            name,
            public_id,
            system_id,
        } => tree.create_doctype(name, public_id, system_id),
        RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                let _ = tree.set_attr(id, attr.name.local.as_ref(), &attr.value);
            }
            import_children(handle, tree, id);
            id
        }
        RcNodeData::ProcessingInstruction { .. } => return None,
    };
    Some(id)
}

/// Convert and append every child of `handle` under `parent`
pub(crate) fn import_children(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        if let Some(id) = import_node(child, tree) {
            let _ = tree.append_child(parent, id);
        }
    }
}
