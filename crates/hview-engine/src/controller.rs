//! Navigation interception controller
//!
//! One `Session` owns a document and handles its navigation events. Per
//! event: decide which regions match the destination; when none do, refresh
//! the matching flags and leave the navigation to the host (the full-reload
//! path is always correct). When some do, intercept: close open popovers,
//! flip region states synchronously, then fetch the destination and stream
//! its placeholders into the body, pumping relay work after every chunk so
//! each target populates as soon as its fragment arrives.
//!
//! The two halves are exposed separately - `intercept` (synchronous) and
//! `complete` (async) - so a host can observe the loading window or wrap
//! its own recovery around the stream. A failed update leaves `loading`
//! set; this engine fails loud rather than reverting UI state it cannot
//! verify.

use hview_css::{Selector, document_has_auto_view_transition, query_all};
use hview_dom::{Document, FOR_ATTR, NodeId, PLACEHOLDER_TAG, RelayRegistry};
use hview_html::{HtmlParser, HtmlStream};
use hview_net::FetchProvider;
use url::Url;

use crate::EngineError;
use crate::region::RegionSet;
use crate::transition::ViewTransitioner;

/// A host navigation event
#[derive(Debug, Clone)]
pub struct NavigateEvent {
    pub destination: Url,
}

impl NavigateEvent {
    pub fn new(destination: Url) -> Self {
        Self { destination }
    }
}

/// Outcome of the region-matching step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No region matched; the host's default navigation proceeds
    PassThrough,
    /// These regions matched; the controller claims the update
    Intercept(Vec<NodeId>),
}

/// What happened to a handled navigation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    PassedThrough,
    Intercepted,
}

/// Focus policy of an interception. The controller never moves focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReset {
    Manual,
    AfterTransition,
}

/// An intercepted navigation between its synchronous and async halves
#[derive(Debug)]
pub struct PendingNavigation {
    destination: Url,
    regions: Vec<NodeId>,
    focus_reset: FocusReset,
    use_transition: bool,
}

impl PendingNavigation {
    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// The regions whose loading state this navigation owns
    pub fn matched_regions(&self) -> &[NodeId] {
        &self.regions
    }

    pub fn focus_reset(&self) -> FocusReset {
        self.focus_reset
    }
}

/// A navigation session over one document
pub struct Session<F: FetchProvider> {
    document: Document,
    base: Url,
    regions: RegionSet,
    relays: RelayRegistry,
    fetcher: F,
    transition: Option<Box<dyn ViewTransitioner>>,
    popover: Selector,
    placeholder_filter: Selector,
    placeholder_all: Selector,
}

impl<F: FetchProvider> Session<F> {
    /// Parse `html` as the session document and run initial discovery:
    /// inline placeholders activate, regions register, and every region's
    /// matching state reflects the session URL.
    pub fn load(html: &str, url: &str, fetcher: F) -> Result<Self, EngineError> {
        let document = HtmlParser::new().parse_with_url(html, url);
        let base = Url::parse(url)?;

        let mut session = Self {
            document,
            base,
            regions: RegionSet::new(),
            relays: RelayRegistry::new(),
            fetcher,
            transition: None,
            popover: Selector::parse("[popover]")?,
            placeholder_filter: Selector::parse(&format!("{PLACEHOLDER_TAG}[{FOR_ATTR}]"))?,
            placeholder_all: Selector::parse(PLACEHOLDER_TAG)?,
        };
        session.relays.scan(&mut session.document)?;
        session.regions.scan(&session.document, &session.base)?;
        session.pump()?;
        let url = session.base.clone();
        session.regions.apply_matching(&mut session.document, &url);

        tracing::info!(url = %session.base, regions = session.regions.len(), "session loaded");
        Ok(session)
    }

    /// Attach a host transition capability
    pub fn with_transition(mut self, transition: Box<dyn ViewTransitioner>) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The session's current URL
    pub fn current_url(&self) -> &Url {
        &self.base
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// Resolve a possibly relative destination against the current URL
    pub fn resolve(&self, destination: &str) -> Result<Url, EngineError> {
        Ok(self.base.join(destination)?)
    }

    /// Drain pending structural changes into the relay and region
    /// registries until the tree is quiescent
    pub fn pump(&mut self) -> Result<(), EngineError> {
        loop {
            let batch = self.document.tree_mut().take_mutations();
            if batch.is_empty() {
                break;
            }
            self.relays.apply(&mut self.document, &batch)?;
            self.regions.apply(&self.document, &self.base, &batch)?;
        }
        Ok(())
    }

    /// The region-matching step, as a testable tagged outcome
    pub fn decide(&self, url: &Url) -> Decision {
        let matched = self.regions.matches(url);
        if matched.is_empty() {
            Decision::PassThrough
        } else {
            Decision::Intercept(matched)
        }
    }

    /// Synchronous half of a navigation.
    ///
    /// Returns `None` on pass-through (matching flags refreshed, nothing
    /// else touched). Otherwise popovers close, matched regions start
    /// loading, all matching flags update, and the pending token for
    /// [`Session::complete`] is returned. Observers see `loading` before
    /// any network activity starts.
    pub fn intercept(
        &mut self,
        event: &NavigateEvent,
    ) -> Result<Option<PendingNavigation>, EngineError> {
        self.pump()?;

        let matched = match self.decide(&event.destination) {
            Decision::PassThrough => {
                tracing::debug!(url = %event.destination, "no region matched; passing through");
                self.regions
                    .apply_matching(&mut self.document, &event.destination);
                return Ok(None);
            }
            Decision::Intercept(matched) => matched,
        };
        tracing::debug!(url = %event.destination, regions = matched.len(), "navigation intercepted");

        let root = self.document.tree().root();
        for popover in query_all(self.document.tree(), root, &self.popover) {
            self.document.hide_popover(popover)?;
        }

        self.regions.set_loading(&mut self.document, &matched, true);
        self.regions
            .apply_matching(&mut self.document, &event.destination);

        let use_transition =
            self.transition.is_some() && document_has_auto_view_transition(&self.document);

        Ok(Some(PendingNavigation {
            destination: event.destination.clone(),
            regions: matched,
            focus_reset: FocusReset::Manual,
            use_transition,
        }))
    }

    /// Async half of a navigation: fetch, stream, settle.
    ///
    /// Errors propagate with `loading` left set on the matched regions;
    /// dropping the future abandons the update with no cleanup guarantee.
    pub async fn complete(&mut self, pending: PendingNavigation) -> Result<(), EngineError> {
        if pending.use_transition {
            if let Some(t) = self.transition.as_mut() {
                t.begin();
            }
        }
        self.update(&pending).await?;
        if pending.use_transition {
            if let Some(t) = self.transition.as_mut() {
                t.complete();
            }
        }
        Ok(())
    }

    async fn update(&mut self, pending: &PendingNavigation) -> Result<(), EngineError> {
        tracing::debug!(url = %pending.destination, "update step started");
        let response = self.fetcher.fetch(&pending.destination).await?;

        let mut stream = HtmlStream::with_selector(response, self.placeholder_filter.clone())?;
        let body = self.document.body();
        loop {
            let more = stream.advance(&mut self.document, body).await?;
            self.pump()?;
            if !more {
                break;
            }
        }

        self.regions
            .set_loading(&mut self.document, &pending.regions, false);

        // The placeholders have served their relocation purpose.
        let root = self.document.tree().root();
        for node in query_all(self.document.tree(), root, &self.placeholder_all) {
            self.document.tree_mut().detach(node)?;
        }
        self.pump()?;

        self.document.set_url(pending.destination.as_str());
        self.base = pending.destination.clone();
        tracing::info!(url = %pending.destination, "navigation settled");
        Ok(())
    }

    /// Handle one navigation event end to end
    pub async fn handle_navigate(
        &mut self,
        event: NavigateEvent,
    ) -> Result<NavigationOutcome, EngineError> {
        match self.intercept(&event)? {
            Some(pending) => {
                self.complete(pending).await?;
                Ok(NavigationOutcome::Intercepted)
            }
            None => Ok(NavigationOutcome::PassedThrough),
        }
    }

    /// Resolve `destination` and handle it as a navigation event
    pub async fn navigate(&mut self, destination: &str) -> Result<NavigationOutcome, EngineError> {
        let event = NavigateEvent::new(self.resolve(destination)?);
        self.handle_navigate(event).await
    }
}
