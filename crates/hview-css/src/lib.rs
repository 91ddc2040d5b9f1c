//! hView CSS
//!
//! The slice of CSS the engine needs: compound selector matching against
//! DOM elements (stream filtering, popover cleanup, `:state()` queries) and
//! detection of an automatic navigation-triggered view-transition rule in
//! stylesheet text.

mod selectors;
mod view_transition;

pub use selectors::{
    AttributeMatcher, AttributeSelector, Selector, SelectorComponent, SelectorError, query_all,
};
pub use view_transition::{declares_auto_navigation, document_has_auto_view_transition};
