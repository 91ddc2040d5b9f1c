//! Fetch boundary
//!
//! The host resolves destination URLs into responses. The engine only ever
//! sees the `FetchProvider` trait, so tests and demos can serve from memory
//! while a real host plugs in its HTTP client.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use url::Url;

use crate::{NetError, Response};

/// Future returned by [`FetchProvider::fetch`]
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Response, NetError>> + Send + 'static>>;

/// A source of responses for navigation fetches
pub trait FetchProvider {
    fn fetch(&mut self, url: &Url) -> FetchFuture;
}

/// In-memory provider routing `path` (or `path?query`) to canned HTML.
///
/// Routes with a query string take precedence over path-only routes, so a
/// search page can serve different content for `/movies?q=x` and `/movies`.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    routes: HashMap<String, Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as a single chunk
    pub fn route(self, path: &str, body: &str) -> Self {
        self.route_chunked(path, [body])
    }

    /// Serve each element of `chunks` as a separate body chunk
    pub fn route_chunked<I, S>(mut self, path: &str, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes
            .insert(path.to_string(), chunks.into_iter().map(Into::into).collect());
        self
    }
}

impl FetchProvider for StaticFetcher {
    fn fetch(&mut self, url: &Url) -> FetchFuture {
        let key = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let chunks = self
            .routes
            .get(&key)
            .or_else(|| self.routes.get(url.path()))
            .cloned();
        tracing::debug!(%url, found = chunks.is_some(), "static fetch");

        Box::pin(async move {
            match chunks {
                Some(chunks) => Ok(Response::chunked(chunks)),
                None => Ok(Response::not_found()),
            }
        })
    }
}
