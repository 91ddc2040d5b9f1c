//! Region registry
//!
//! A region element (`<h-view match="...">`) declares that part of the
//! document cares about navigations matching a URL pattern. Regions expose
//! exactly two custom states, `matching` and `loading`, and nothing else;
//! the surrounding page reads them through `:state()` selectors.
//!
//! Instead of re-querying the whole document on every navigation, regions
//! live in an explicit registry fed from the mutation journal, so the set
//! follows the document as it changes. A malformed pattern fails at
//! registration time.

use hview_dom::{Document, DomTree, Mutation, MutationKind, NodeId};
use url::Url;

use crate::pattern::{PatternError, UrlPattern};

/// Tag name of region elements
pub const REGION_TAG: &str = "h-view";

/// Attribute carrying the URL pattern
pub const MATCH_ATTR: &str = "match";

/// Custom state set while the region's pattern matches the current URL
pub const MATCHING_STATE: &str = "matching";

/// Custom state set while a navigation for this region is in flight
pub const LOADING_STATE: &str = "loading";

#[derive(Debug)]
struct Region {
    node: NodeId,
    pattern: UrlPattern,
}

/// Registry of declared regions
#[derive(Debug, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

/// Whether `id` is a region element with a `match` attribute
pub fn is_region(tree: &DomTree, id: NodeId) -> bool {
    tree.get(id)
        .and_then(|n| n.as_element())
        .is_some_and(|e| e.tag_name == REGION_TAG && e.has_attr(MATCH_ATTR))
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Register every region already present in the connected tree
    pub fn scan(&mut self, doc: &Document, base: &Url) -> Result<(), PatternError> {
        let root = doc.tree().root();
        for id in doc.tree().subtree(root) {
            if is_region(doc.tree(), id) {
                self.register(doc, base, id)?;
            }
        }
        Ok(())
    }

    /// Track regions entering or leaving the document
    pub fn apply(
        &mut self,
        doc: &Document,
        base: &Url,
        batch: &[Mutation],
    ) -> Result<(), PatternError> {
        self.regions.retain(|r| doc.tree().is_connected(r.node));

        for mutation in batch {
            if mutation.kind != MutationKind::ChildrenAdded {
                continue;
            }
            for &node in &mutation.nodes {
                if !doc.tree().is_connected(node) {
                    continue;
                }
                for id in doc.tree().subtree(node) {
                    if is_region(doc.tree(), id) {
                        self.register(doc, base, id)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn register(&mut self, doc: &Document, base: &Url, node: NodeId) -> Result<(), PatternError> {
        if self.regions.iter().any(|r| r.node == node) {
            return Ok(());
        }
        let Some(raw) = doc.tree().attr(node, MATCH_ATTR) else {
            return Ok(());
        };
        let pattern = UrlPattern::compile(raw, base)?;
        tracing::debug!(pattern = %pattern.source(), "region registered");
        self.regions.push(Region { node, pattern });
        Ok(())
    }

    /// Regions whose pattern matches `url`
    pub fn matches(&self, url: &Url) -> Vec<NodeId> {
        self.regions
            .iter()
            .filter(|r| r.pattern.matches(url))
            .map(|r| r.node)
            .collect()
    }

    /// Set the `matching` state on every region to reflect `url`
    pub fn apply_matching(&self, doc: &mut Document, url: &Url) {
        for region in &self.regions {
            let on = region.pattern.matches(url);
            let _ = doc.tree_mut().set_state(region.node, MATCHING_STATE, on);
        }
    }

    /// Flip the `loading` state on the given regions
    pub fn set_loading(&self, doc: &mut Document, nodes: &[NodeId], on: bool) {
        for &node in nodes {
            let _ = doc.tree_mut().set_state(node, LOADING_STATE, on);
        }
    }
}
