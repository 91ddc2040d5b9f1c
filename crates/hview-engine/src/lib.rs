//! hView Engine
//!
//! Progressive streamed-HTML navigation: when a navigation's destination
//! matches a declared region of the page, the engine intercepts it, streams
//! the destination document, and relocates its placeholder fragments into
//! the live targets as they arrive - no full reload, no hand-written
//! client-side router.
//!
//! # Example
//! ```rust,ignore
//! use hview_engine::Session;
//! use hview_net::StaticFetcher;
//!
//! let fetcher = StaticFetcher::new().route("/movies", page_html);
//! let mut session = Session::load(index_html, "https://example.com/", fetcher)?;
//! smol::block_on(session.navigate("/movies"))?;
//! ```

mod controller;
mod pattern;
mod region;
mod transition;

pub use controller::{
    Decision, FocusReset, NavigateEvent, NavigationOutcome, PendingNavigation, Session,
};
pub use pattern::{PatternError, UrlPattern};
pub use region::{LOADING_STATE, MATCH_ATTR, MATCHING_STATE, REGION_TAG, RegionSet, is_region};
pub use transition::ViewTransitioner;

// Re-export sub-crates for advanced usage
pub use hview_css as css;
pub use hview_dom as dom;
pub use hview_html as html;
pub use hview_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Dom(#[from] hview_dom::DomError),

    #[error(transparent)]
    Selector(#[from] hview_css::SelectorError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Net(#[from] hview_net::NetError),

    #[error(transparent)]
    Stream(#[from] hview_html::StreamError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
