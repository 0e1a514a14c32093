//! Per-method exact-match route tables.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::http::request::Method;
use crate::result::RequestResult;

/// A route handler: a pure function of the request context, returning the
/// result that concludes the exchange. Side effects are limited to session
/// mutation through the context's session handle.
pub type Handler = Arc<dyn Fn(&RequestContext) -> RequestResult + Send + Sync>;

/// Exact-path route tables, one per supported method.
///
/// Paths are case-sensitive absolute paths; the query string is stripped
/// before lookup. Registration must finish before the server starts; the
/// tables are never mutated while serving.
#[derive(Default)]
pub struct Router {
    get: HashMap<String, Handler>,
    post: HashMap<String, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_get(
        &mut self,
        path: impl Into<String>,
        handler: impl Fn(&RequestContext) -> RequestResult + Send + Sync + 'static,
    ) {
        self.get.insert(path.into(), Arc::new(handler));
    }

    pub fn add_post(
        &mut self,
        path: impl Into<String>,
        handler: impl Fn(&RequestContext) -> RequestResult + Send + Sync + 'static,
    ) {
        self.post.insert(path.into(), Arc::new(handler));
    }

    /// O(1) exact-match lookup. Only GET and POST have tables.
    pub fn lookup(&self, method: Method, path: &str) -> Option<&Handler> {
        match method {
            Method::GET => self.get.get(path),
            Method::POST => self.post.get(path),
            _ => None,
        }
    }
}
