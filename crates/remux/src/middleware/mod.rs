//! Middleware: behaviour layered around a handler once, when the route is registered.
//!
//! A [`Middleware`] turns a handler into another handler. [`compose`] applies a list of them so
//! that the first middleware of the list is the outermost layer: a request passes through
//! `m1`, then `m2`, ..., and reaches the terminal handler last.
//!
//! The composed handler is what the routing table stores, so nothing is re-wrapped per request.

mod logger;
mod recoverer;

use crate::handler::BoxedHandler;

pub use logger::Logger;
pub use recoverer::Recoverer;

/// A transform from one handler to another
pub trait Middleware: Send + Sync {
    /// wrap the handler to another
    fn wrap(&self, handler: BoxedHandler) -> BoxedHandler;
}

/// A [`Middleware`] backed by a closure
#[derive(Clone, Copy)]
pub struct MiddlewareFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for MiddlewareFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFn").finish_non_exhaustive()
    }
}

/// Creates a [`Middleware`] from a closure that wraps a [`BoxedHandler`]
pub fn middleware_fn<F>(f: F) -> MiddlewareFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    MiddlewareFn { f }
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    fn wrap(&self, handler: BoxedHandler) -> BoxedHandler {
        (self.f)(handler)
    }
}

/// Wraps `handler` so that `middlewares[0]` is the outermost layer.
pub fn compose(handler: BoxedHandler, middlewares: &[&dyn Middleware]) -> BoxedHandler {
    middlewares.iter().rev().fold(handler, |handler, middleware| middleware.wrap(handler))
}
