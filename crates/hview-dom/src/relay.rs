//! Placeholder relay binder
//!
//! A placeholder element (`<h-template for="id">`) carries content destined
//! for the element whose id matches its `for` attribute. On activation the
//! binder replaces the target's children with the placeholder's children and
//! keeps relaying anything appended to the placeholder afterwards, so the
//! target fills in no matter which of placeholder/target/content arrives
//! first.
//!
//! Binders are held in an explicit registry fed from the mutation journal:
//! the registry discovers placeholders in inserted subtrees, retries target
//! lookup for deferred binders on every batch, and drops binders whose
//! placeholder has left the document.

use crate::{Document, DomResult, DomTree, Mutation, MutationKind, NodeId};

/// Tag name of placeholder elements
pub const PLACEHOLDER_TAG: &str = "h-template";

/// Attribute naming the target element id
pub const FOR_ATTR: &str = "for";

#[derive(Debug)]
struct RelayBinder {
    placeholder: NodeId,
    target_id: String,
    /// Bound target, NONE while the target has not appeared yet
    target: NodeId,
}

/// Registry of active relay binders
#[derive(Debug, Default)]
pub struct RelayRegistry {
    binders: Vec<RelayBinder>,
}

/// Whether `id` is a placeholder element with a `for` attribute
pub fn is_placeholder(tree: &DomTree, id: NodeId) -> bool {
    tree.get(id)
        .and_then(|n| n.as_element())
        .is_some_and(|e| e.tag_name == PLACEHOLDER_TAG && e.has_attr(FOR_ATTR))
}

impl RelayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live binders
    pub fn len(&self) -> usize {
        self.binders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    /// Activate every placeholder already present in the connected tree,
    /// in document order. Used once after the initial parse.
    pub fn scan(&mut self, doc: &mut Document) -> DomResult<()> {
        let root = doc.tree().root();
        for id in doc.tree().subtree(root) {
            if is_placeholder(doc.tree(), id) {
                self.activate(doc, id)?;
            }
        }
        Ok(())
    }

    /// React to one batch of structural mutations.
    ///
    /// Relay work performed here journals further mutations; the caller
    /// drains batches until the tree is quiescent.
    pub fn apply(&mut self, doc: &mut Document, batch: &[Mutation]) -> DomResult<()> {
        // A binder whose placeholder left the document stops, silently.
        self.binders
            .retain(|b| doc.tree().is_connected(b.placeholder));

        for mutation in batch {
            if mutation.kind != MutationKind::ChildrenAdded {
                continue;
            }

            // New placeholders anywhere in the inserted subtrees.
            for &node in &mutation.nodes {
                if !doc.tree().is_connected(node) {
                    continue;
                }
                for id in doc.tree().subtree(node) {
                    if is_placeholder(doc.tree(), id) {
                        self.activate(doc, id)?;
                    }
                }
            }

            // Children appended to a live placeholder relay straight through.
            let bound = self.binders.iter().find_map(|b| {
                (b.placeholder == mutation.parent && b.target.is_valid()).then_some(b.target)
            });
            if let Some(target) = bound {
                if doc.tree().is_connected(mutation.parent) {
                    for &node in &mutation.nodes {
                        // Skip nodes the activation step already moved.
                        let still_here = doc
                            .tree()
                            .get(node)
                            .is_some_and(|n| n.parent == mutation.parent);
                        if still_here {
                            doc.tree_mut().append_child(target, node)?;
                        }
                    }
                }
            }

            // Any insertion may have produced a target a binder waits for.
            self.resolve_waiting(doc)?;
        }
        Ok(())
    }

    fn activate(&mut self, doc: &mut Document, placeholder: NodeId) -> DomResult<()> {
        if self.binders.iter().any(|b| b.placeholder == placeholder) {
            return Ok(());
        }
        if !doc.tree().is_connected(placeholder) {
            return Ok(());
        }
        let Some(target_id) = doc.tree().attr(placeholder, FOR_ATTR).map(str::to_string) else {
            return Ok(());
        };

        // A later placeholder supersedes the previous one for this target.
        let before = self.binders.len();
        self.binders.retain(|b| b.target_id != target_id);
        if self.binders.len() != before {
            tracing::debug!(target_id, "placeholder superseded");
        }

        self.binders.push(RelayBinder {
            placeholder,
            target_id,
            target: NodeId::NONE,
        });
        self.try_bind(self.binders.len() - 1, doc)
    }

    fn resolve_waiting(&mut self, doc: &mut Document) -> DomResult<()> {
        for idx in 0..self.binders.len() {
            if !self.binders[idx].target.is_valid() {
                self.try_bind(idx, doc)?;
            }
        }
        Ok(())
    }

    /// Look the target up; when present, replace its content with the
    /// placeholder's current children.
    fn try_bind(&mut self, idx: usize, doc: &mut Document) -> DomResult<()> {
        let placeholder = self.binders[idx].placeholder;
        if !doc.tree().is_connected(placeholder) {
            return Ok(());
        }
        let Some(target) = doc.tree().element_by_id(&self.binders[idx].target_id) else {
            return Ok(());
        };
        if target == placeholder {
            return Ok(());
        }

        for child in doc.tree().child_ids(target) {
            doc.tree_mut().detach(child)?;
        }
        for child in doc.tree().child_ids(placeholder) {
            doc.tree_mut().append_child(target, child)?;
        }

        tracing::debug!(
            target_id = %self.binders[idx].target_id,
            "placeholder bound to target"
        );
        self.binders[idx].target = target;
        Ok(())
    }
}
