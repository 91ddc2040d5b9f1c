//! DOM Tree (arena-based allocation)
//!
//! Node 0 is always the document node. Detached nodes stay in the arena
//! until the tree is dropped; "removing" a subtree means unlinking it.
//!
//! The tree keeps two side structures the rest of the engine relies on:
//! an id registry mapping the `id` attributes of *connected* elements to
//! their nodes, and the mutation journal (see [`crate::mutations`]).

use std::collections::HashMap;

use crate::{DomError, DomResult, Mutation, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// id attribute -> connected element
    ids: HashMap<String, NodeId>,
    /// Pending structural mutation records
    journal: Vec<Mutation>,
}

impl DomTree {
    /// Create a tree containing only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            ids: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node::element(tag_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(content.to_string())))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    /// Whether `node` is reachable from the document node
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            if cur == NodeId::ROOT {
                return true;
            }
            match self.get(cur) {
                Some(n) if n.parent.is_valid() => cur = n.parent,
                _ => return false,
            }
        }
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that is currently linked elsewhere is detached first. If the
    /// parent is connected the subtree's ids are registered and the change
    /// is journaled.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if self.get(child).is_some_and(|n| n.parent.is_valid()) {
            self.detach(child)?;
        }

        let old_last = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = old_last;
            node.next_sibling = NodeId::NONE;
        }
        if old_last.is_valid() {
            self.nodes[old_last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;

        if self.is_connected(parent) {
            self.register_subtree(child);
            self.journal.push(Mutation::children_added(parent, vec![child]));
        }
        Ok(())
    }

    /// Unlink `node` from its parent.
    ///
    /// Journals the removal when the node was part of the connected tree.
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        let (parent, prev, next) = match self.get(node) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return Err(DomError::NotFound),
        };
        if !parent.is_valid() {
            return Ok(());
        }
        let was_connected = self.is_connected(parent);

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }
        {
            let n = &mut self.nodes[node.0 as usize];
            n.parent = NodeId::NONE;
            n.prev_sibling = NodeId::NONE;
            n.next_sibling = NodeId::NONE;
        }

        if was_connected {
            self.unregister_subtree(node);
            self.journal.push(Mutation::children_removed(parent, vec![node]));
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cur = node;
        while let Some(n) = self.get(cur) {
            if !n.parent.is_valid() {
                return false;
            }
            if n.parent == candidate {
                return true;
            }
            cur = n.parent;
        }
        false
    }

    fn register_subtree(&mut self, root: NodeId) {
        for id in self.subtree(root) {
            if let Some(elem_id) = self.get(id).and_then(|n| n.as_element()).and_then(|e| e.id.clone())
            {
                self.ids.entry(elem_id).or_insert(id);
            }
        }
    }

    fn unregister_subtree(&mut self, root: NodeId) {
        for id in self.subtree(root) {
            if let Some(elem_id) = self.get(id).and_then(|n| n.as_element()).and_then(|e| e.id.clone())
            {
                if self.ids.get(&elem_id) == Some(&id) {
                    self.ids.remove(&elem_id);
                }
            }
        }
    }

    /// Look up a connected element by its id attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Set an attribute on an element, keeping the id registry current
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let connected = self.is_connected(node);
        let old_id = self
            .get(node)
            .ok_or(DomError::NotFound)?
            .as_element()
            .ok_or(DomError::NotAnElement)?
            .id
            .clone();

        self.nodes[node.0 as usize]
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?
            .set_attr(name, value);

        if name == "id" && connected {
            if let Some(old) = old_id {
                if self.ids.get(&old) == Some(&node) {
                    self.ids.remove(&old);
                }
            }
            self.ids.entry(value.to_string()).or_insert(node);
        }
        Ok(())
    }

    /// Get an attribute value from an element
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.as_element()?.get_attr(name)
    }

    /// Add or remove a custom element state
    pub fn set_state(&mut self, node: NodeId, state: &str, on: bool) -> DomResult<()> {
        self.get_mut(node)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?
            .set_state(state, on);
        Ok(())
    }

    /// Check a custom element state
    pub fn has_state(&self, node: NodeId, state: &str) -> bool {
        self.get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_state(state))
    }

    /// Child node ids of `parent`, in order
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        while cur.is_valid() {
            out.push(cur);
            cur = self.nodes[cur.0 as usize].next_sibling;
        }
        out
    }

    /// Iterate over the children of `parent`
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        self.child_ids(parent)
            .into_iter()
            .map(|id| (id, &self.nodes[id.0 as usize]))
    }

    /// All nodes of the subtree rooted at `root` (inclusive), depth-first
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.get(id).is_none() {
                continue;
            }
            out.push(id);
            let mut children = self.child_ids(id);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Concatenated text of all descendant text nodes, in document order
    pub fn text_content(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(root, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.get(node) else { return };
        if let Some(text) = n.as_text() {
            out.push_str(text);
        }
        let mut cur = n.first_child;
        while cur.is_valid() {
            self.collect_text(cur, out);
            cur = self.nodes[cur.0 as usize].next_sibling;
        }
    }

    /// Drain one batch of pending mutation records
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Whether mutation records are pending
    pub fn has_pending_mutations(&self) -> bool {
        !self.journal.is_empty()
    }

    /// Discard pending mutation records without dispatching them
    pub fn clear_mutations(&mut self) {
        self.journal.clear();
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutationKind;

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.child_ids(div), vec![a, b]);
        assert_eq!(tree.text_content(div), "ab");
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        let c = tree.create_text("c");
        for n in [a, b, c] {
            tree.append_child(div, n).unwrap();
        }

        tree.detach(b).unwrap();
        assert_eq!(tree.child_ids(div), vec![a, c]);
        assert_eq!(tree.text_content(div), "ac");
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let from = tree.create_element("div");
        let to = tree.create_element("div");
        tree.append_child(tree.root(), from).unwrap();
        tree.append_child(tree.root(), to).unwrap();
        let child = tree.create_text("x");
        tree.append_child(from, child).unwrap();

        tree.append_child(to, child).unwrap();
        assert!(tree.child_ids(from).is_empty());
        assert_eq!(tree.child_ids(to), vec![child]);
    }

    #[test]
    fn test_hierarchy_error() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_id_registry_follows_connectivity() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attr(div, "id", "main").unwrap();

        // Detached nodes are not registered.
        assert_eq!(tree.element_by_id("main"), None);

        tree.append_child(tree.root(), div).unwrap();
        assert_eq!(tree.element_by_id("main"), Some(div));

        tree.detach(div).unwrap();
        assert_eq!(tree.element_by_id("main"), None);
    }

    #[test]
    fn test_id_registry_registers_whole_subtree() {
        let mut tree = DomTree::new();
        let wrapper = tree.create_element("section");
        let inner = tree.create_element("span");
        tree.set_attr(inner, "id", "deep").unwrap();
        tree.append_child(wrapper, inner).unwrap();

        tree.append_child(tree.root(), wrapper).unwrap();
        assert_eq!(tree.element_by_id("deep"), Some(inner));
    }

    #[test]
    fn test_journal_only_for_connected_tree() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let child = tree.create_text("x");
        tree.append_child(div, child).unwrap();
        assert!(!tree.has_pending_mutations());

        tree.append_child(tree.root(), div).unwrap();
        let batch = tree.take_mutations();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, MutationKind::ChildrenAdded);
        assert_eq!(batch[0].parent, tree.root());
        assert_eq!(batch[0].nodes, vec![div]);
    }

    #[test]
    fn test_journal_records_removal() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        tree.take_mutations();

        tree.detach(div).unwrap();
        let batch = tree.take_mutations();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, MutationKind::ChildrenRemoved);
        assert_eq!(batch[0].nodes, vec![div]);
    }
}
