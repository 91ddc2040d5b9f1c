//! Incremental HTML stream session
//!
//! One `HtmlStream` exists per navigation fetch. Response chunks feed an
//! off-document html5ever sandbox; after every chunk the session harvests
//! the sandbox body's newly *stable* top-level nodes, imports them into the
//! live tree, and appends the ones that satisfy the selector (all of them,
//! when no selector is set) to the destination container. A node is stable
//! once a following sibling exists or the stream has ended; the last node
//! may still be receiving parser output, so it is held back.
//!
//! Delivery therefore happens while bytes are still arriving; end of
//! stream only flushes the tail.

use html5ever::driver::Parser;
use html5ever::parse_document;
use html5ever::tendril::stream::Utf8LossyDecoder;
use html5ever::tendril::{ByteTendril, TendrilSink};
use hview_css::Selector;
use hview_dom::{Document, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use smol::stream::StreamExt;

use crate::StreamError;
use crate::parser::import_node;
use hview_net::{BodyStream, Response};

/// One response body being incrementally parsed into a destination
pub struct HtmlStream {
    body: BodyStream,
    selector: Option<Selector>,
    /// Incremental parser; consumed when the stream ends
    parser: Option<Utf8LossyDecoder<Parser<RcDom>>>,
    /// Sandbox document the parser builds under
    sandbox: Handle,
    /// Count of sandbox body children already harvested
    harvested: usize,
    finished: bool,
}

impl HtmlStream {
    /// Start a session delivering every parsed node.
    ///
    /// Fails with [`StreamError::StreamUnavailable`] if the response has no
    /// readable body; nothing is parsed in that case.
    pub fn new(response: Response) -> Result<Self, StreamError> {
        Self::build(response, None)
    }

    /// Start a session delivering only nodes matching `selector`
    pub fn with_selector(response: Response, selector: Selector) -> Result<Self, StreamError> {
        Self::build(response, Some(selector))
    }

    fn build(mut response: Response, selector: Option<Selector>) -> Result<Self, StreamError> {
        let body = response.take_body().ok_or(StreamError::StreamUnavailable)?;

        let dom = RcDom::default();
        let sandbox = dom.document.clone();
        let parser = parse_document(dom, Default::default()).from_utf8();

        tracing::debug!(filtered = selector.is_some(), "stream session started");
        Ok(Self {
            body,
            selector,
            parser: Some(parser),
            sandbox,
            harvested: 0,
            finished: false,
        })
    }

    /// Consume one chunk from the body and deliver what became stable.
    ///
    /// Returns `false` once the stream has ended and the parse has been
    /// finalized. The engine interleaves its mutation pump between calls.
    pub async fn advance(
        &mut self,
        doc: &mut Document,
        dest: NodeId,
    ) -> Result<bool, StreamError> {
        if self.finished {
            return Ok(false);
        }
        match self.body.next().await {
            Some(Ok(chunk)) => {
                tracing::trace!(bytes = chunk.len(), "stream chunk");
                if let Some(parser) = self.parser.as_mut() {
                    parser.process(ByteTendril::from(&chunk[..]));
                }
                self.harvest(doc, dest)?;
                Ok(true)
            }
            Some(Err(err)) => Err(err.into()),
            None => {
                self.finished = true;
                if let Some(parser) = self.parser.take() {
                    parser.finish();
                }
                self.harvest(doc, dest)?;
                tracing::debug!("stream session finished");
                Ok(false)
            }
        }
    }

    /// Run the session to completion
    pub async fn stream_to(mut self, doc: &mut Document, dest: NodeId) -> Result<(), StreamError> {
        while self.advance(doc, dest).await? {}
        Ok(())
    }

    fn harvest(&mut self, doc: &mut Document, dest: NodeId) -> Result<(), StreamError> {
        let Some(body) = sandbox_body(&self.sandbox) else {
            return Ok(());
        };
        let children: Vec<Handle> = body.children.borrow().clone();
        let stable = if self.finished {
            children.len()
        } else {
            children.len().saturating_sub(1)
        };

        for handle in children.iter().take(stable).skip(self.harvested) {
            self.deliver(handle, doc, dest)?;
        }
        self.harvested = self.harvested.max(stable);
        Ok(())
    }

    /// Import one parsed sandbox node and append the selected parts of it
    /// to the destination. Unselected content is dropped.
    fn deliver(
        &self,
        handle: &Handle,
        doc: &mut Document,
        dest: NodeId,
    ) -> Result<(), StreamError> {
        let Some(node) = import_node(handle, doc.tree_mut()) else {
            return Ok(());
        };
        match &self.selector {
            None => {
                doc.tree_mut().append_child(dest, node)?;
            }
            Some(selector) => {
                for matched in matching_elements(doc.tree(), node, selector) {
                    doc.tree_mut().append_child(dest, matched)?;
                }
            }
        }
        Ok(())
    }
}

/// Matching elements of the subtree at `root`, pre-order; matched subtrees
/// are delivered whole, so descent stops at a match
fn matching_elements(tree: &DomTree, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if selector.matches_node(tree, id) {
            out.push(id);
            continue;
        }
        let mut children = tree.child_ids(id);
        children.reverse();
        stack.extend(children);
    }
    out
}

fn sandbox_body(document: &Handle) -> Option<Handle> {
    let html = child_element(document, "html")?;
    child_element(&html, "body")
}

fn child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|h| matches!(&h.data, RcNodeData::Element { name, .. } if name.local.as_ref() == tag))
        .cloned()
}
