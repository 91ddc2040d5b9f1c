//! hView Networking
//!
//! The engine treats the HTTP backend as an opaque producer of HTML byte
//! streams. This crate is that boundary: a `Response` whose body arrives as
//! an async stream of chunks, the `FetchProvider` trait a host implements
//! to resolve a destination URL into a response, and an in-memory provider
//! for tests and demos.

mod fetch;

pub use fetch::{FetchFuture, FetchProvider, StaticFetcher};
pub use url::Url;

use std::pin::Pin;

use smol::stream::Stream;

/// A response body: chunks of bytes arriving over time
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, NetError>> + Send + 'static>>;

/// HTTP Response
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    body: Option<BodyStream>,
}

impl Response {
    /// A 200 response streaming `body` as one chunk
    pub fn html(body: &str) -> Self {
        Self::chunked([body])
    }

    /// A 200 response streaming each element of `chunks` separately
    pub fn chunked<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks: Vec<Result<Vec<u8>, NetError>> = chunks
            .into_iter()
            .map(|c| Ok(c.into().into_bytes()))
            .collect();
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: Some(Box::pin(smol::stream::iter(chunks))),
        }
    }

    /// A response with no readable body
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A 404 response with an empty HTML body
    pub fn not_found() -> Self {
        let mut response = Self::html("");
        response.status = 404;
        response
    }

    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Take ownership of the body stream, if the response has one
    pub fn take_body(&mut self) -> Option<BodyStream> {
        self.body.take()
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
