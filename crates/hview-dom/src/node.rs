//! DOM Node - Compact representation
//!
//! Nodes live in the tree arena and link to relatives through `NodeId`
//! instead of pointers. Element data caches the `id` attribute and class
//! list, and carries the custom-state set used by region elements.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a document root node
    pub fn document() -> Self {
        Self::new(NodeData::Document)
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::new(NodeData::Element(ElementData::new(tag_name)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::new(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag_name: String,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
    /// Custom element states, matched by `:state(name)`
    pub states: Vec<String>,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, updating the id/class caches
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }

        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Check whether a custom state is set
    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Add or remove a custom state
    pub fn set_state(&mut self, state: &str, on: bool) {
        if on {
            if !self.has_state(state) {
                self.states.push(state.to_string());
            }
        } else {
            self.states.retain(|s| s != state);
        }
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_updates_caches() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag_name, "div");

        elem.set_attr("id", "main");
        elem.set_attr("class", "grid wide");

        assert_eq!(elem.id.as_deref(), Some("main"));
        assert_eq!(elem.classes, vec!["grid", "wide"]);
        assert_eq!(elem.get_attr("id"), Some("main"));
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut elem = ElementData::new("div");
        elem.set_attr("data-x", "1");
        elem.set_attr("data-x", "2");

        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.get_attr("data-x"), Some("2"));
    }

    #[test]
    fn test_custom_states() {
        let mut elem = ElementData::new("h-view");
        assert!(!elem.has_state("loading"));

        elem.set_state("loading", true);
        elem.set_state("loading", true);
        assert!(elem.has_state("loading"));
        assert_eq!(elem.states.len(), 1);

        elem.set_state("loading", false);
        assert!(!elem.has_state("loading"));
    }
}
