//! The request router.
//!
//! A [`Router`] owns a routing table with two kinds of routes:
//!
//! - exact routes, a literal path such as `/users`, matched by string equality
//! - pattern routes, an anchored [`Regex`] such as `^/users/(?P<id>\d+)$`, whose capture groups
//!   become the request's [`PathParams`]
//!
//! Dispatch looks for an exact route first, then tries the pattern routes of the request
//! method in registration order and takes the first one that matches. A request that matches
//! nothing goes to the fallback handler, which answers `404 Not Found` unless replaced.
//!
//! ## Thread Safety
//!
//! The table and the fallback sit behind one reader/writer lock. Registration takes the write
//! lock, dispatch takes the read lock only long enough to pick a handler, so handlers run
//! without holding it and may themselves register routes or replace the fallback.
//!
//! # Example
//!
//! ```
//! use regex::Regex;
//! use remux::middleware::{Logger, Recoverer};
//! use remux::{handler_fn, HandlerError, RequestContext, Router};
//!
//! async fn user(req: RequestContext) -> Result<String, HandlerError> {
//!     let params = req.path_params()?;
//!     Ok(format!("user {}", params.named("id").unwrap_or_default()))
//! }
//!
//! let router = Router::new();
//! router
//!     .register_pattern("GET", Regex::new(r"^/users/(?P<id>\d+)$").unwrap(), handler_fn(user), &[&Recoverer, &Logger])
//!     .unwrap();
//! ```

mod table;

use crate::body::ResponseBody;
use crate::handler::{BoxedHandler, RequestHandler};
use crate::middleware::{compose, Middleware};
use crate::{handler_fn, HandlerError, PathParams, RequestContext, RouteError, RouteMethod};
use async_trait::async_trait;
use http::{Method, Response, StatusCode};
use parking_lot::RwLock;
use regex::Regex;
use std::convert::Infallible;
use std::sync::Arc;
use table::RoutingTable;
use tracing::{debug, trace};

/// Routes requests to handlers registered for a method and an exact path or a path pattern.
pub struct Router {
    inner: RwLock<RouterState>,
}

struct RouterState {
    table: RoutingTable,
    fallback: BoxedHandler,
}

async fn not_found(_req: RequestContext) -> Result<StatusCode, Infallible> {
    Ok(StatusCode::NOT_FOUND)
}

impl Router {
    /// Creates an empty router whose fallback answers `404 Not Found` with an empty body
    pub fn new() -> Self {
        Self { inner: RwLock::new(RouterState { table: RoutingTable::default(), fallback: handler_fn(not_found) }) }
    }

    /// Registers `handler` for requests whose path is exactly `path`.
    ///
    /// `middlewares` are applied once, here, with the first one as the outermost layer.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidMethod`] if `method` is not one of GET, POST, PUT, PATCH, DELETE
    /// - [`RouteError::InvalidPath`] if `path` does not start with `/`
    /// - [`RouteError::NilHandler`] if `handler` is `None`
    /// - [`RouteError::AmbiguousMapping`] if `path` is already registered for `method`
    pub fn register_exact(
        &self,
        method: impl AsRef<str>,
        path: &str,
        handler: impl Into<Option<BoxedHandler>>,
        middlewares: &[&dyn Middleware],
    ) -> Result<(), RouteError> {
        let method = RouteMethod::try_from(method.as_ref())?;
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath);
        }
        let handler = compose(handler.into().ok_or(RouteError::NilHandler)?, middlewares);

        self.inner.write().table.insert_exact(method, path, handler)?;
        debug!(%method, path, middlewares = middlewares.len(), "exact route registered");
        Ok(())
    }

    /// Registers `handler` for requests whose path matches `pattern`.
    ///
    /// The pattern must be anchored at both ends: its source starts with `^/` and ends with
    /// `$`. Pattern routes of one method are tried in the order they were registered.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidMethod`] if `method` is not one of GET, POST, PUT, PATCH, DELETE
    /// - [`RouteError::InvalidPath`] if the pattern is not anchored
    /// - [`RouteError::NilHandler`] if `handler` is `None`
    /// - [`RouteError::AmbiguousMapping`] if this very pattern object is already registered
    ///   for `method`; a separately compiled pattern with the same source is a new route
    pub fn register_pattern(
        &self,
        method: impl AsRef<str>,
        pattern: impl Into<Arc<Regex>>,
        handler: impl Into<Option<BoxedHandler>>,
        middlewares: &[&dyn Middleware],
    ) -> Result<(), RouteError> {
        let method = RouteMethod::try_from(method.as_ref())?;
        let pattern = pattern.into();
        if !is_anchored(&pattern) {
            return Err(RouteError::InvalidPath);
        }
        let handler = compose(handler.into().ok_or(RouteError::NilHandler)?, middlewares);

        self.inner.write().table.insert_pattern(method, Arc::clone(&pattern), handler)?;
        debug!(%method, pattern = pattern.as_str(), middlewares = middlewares.len(), "pattern route registered");
        Ok(())
    }

    /// Replaces the handler used for requests no route matches.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NilHandler`] if `handler` is `None`; the current fallback stays.
    pub fn set_fallback(&self, handler: impl Into<Option<BoxedHandler>>) -> Result<(), RouteError> {
        let handler = handler.into().ok_or(RouteError::NilHandler)?;
        self.inner.write().fallback = handler;
        debug!("fallback handler replaced");
        Ok(())
    }

    /// Picks the handler for a request without invoking it.
    ///
    /// Returns the parameters captured when a pattern route was selected. Methods outside
    /// the routable set always resolve to the fallback.
    pub fn resolve(&self, method: &Method, path: &str) -> (BoxedHandler, Option<PathParams>) {
        let state = self.inner.read();

        let resolved = RouteMethod::try_from(method).ok().and_then(|method| state.table.lookup(method, path));
        match resolved {
            Some(resolved) => {
                trace!(%method, path, with_params = resolved.1.is_some(), "route matched");
                resolved
            }
            None => {
                trace!(%method, path, "no route matched, using fallback");
                (Arc::clone(&state.fallback), None)
            }
        }
    }

    /// Resolves the request and invokes the selected handler.
    ///
    /// Routing never fails: unmatched requests go to the fallback. An `Err` can only come from
    /// a handler that was not wrapped by a recovery middleware.
    ///
    /// # Errors
    ///
    /// Returns the error of the invoked handler.
    pub async fn dispatch(&self, mut req: RequestContext) -> Result<Response<ResponseBody>, HandlerError> {
        let (handler, path_params) = self.resolve(req.method(), req.path());
        if let Some(path_params) = path_params {
            req.attach_path_params(path_params);
        }

        handler.invoke(req).await
    }

    /// Returns the number of registered routes across all methods
    pub fn route_count(&self) -> usize {
        self.inner.read().table.len()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("routes", &self.route_count()).finish_non_exhaustive()
    }
}

#[async_trait]
impl RequestHandler for Router {
    async fn invoke(&self, req: RequestContext) -> Result<Response<ResponseBody>, HandlerError> {
        self.dispatch(req).await
    }
}

fn is_anchored(pattern: &Regex) -> bool {
    let source = pattern.as_str();
    source.starts_with("^/") && source.ends_with('$')
}
