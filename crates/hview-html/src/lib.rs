//! hView HTML Parser
//!
//! HTML5 parsing built on html5ever. Two fronts: a one-shot parser for the
//! initial document, and [`HtmlStream`], which parses a response body chunk
//! by chunk and delivers parsed nodes into the live document before the
//! stream finishes.

mod parser;
mod stream;

pub use parser::HtmlParser;
pub use stream::HtmlStream;

use hview_dom::DomError;
use hview_net::NetError;

/// Stream session errors
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The response carried no readable body; raised before any parsing
    #[error("response body is not readable")]
    StreamUnavailable,

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Dom(#[from] DomError),
}
