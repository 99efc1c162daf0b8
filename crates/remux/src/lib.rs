//! A request router with exact and regular-expression routes.
//!
//! Routes are registered per HTTP method, either for a literal path or for an anchored
//! [`regex::Regex`]. Each registration may carry a list of [`middleware`] layers, composed
//! around the handler once at registration time. Dispatch prefers exact routes, then takes the
//! first pattern route that matches, and falls back to a replaceable not-found handler.
//!
//! Capture groups of the matched pattern are attached to the request's [`RequestContext`]
//! and read back with [`RequestContext::path_params`].
//!
//! # Example
//!
//! ```
//! use http::{Method, Request, StatusCode};
//! use regex::Regex;
//! use remux::middleware::{Logger, Recoverer};
//! use remux::{handler_fn, HandlerError, RequestContext, Router};
//!
//! async fn hello(_req: RequestContext) -> Result<&'static str, HandlerError> {
//!     Ok("hello world")
//! }
//!
//! async fn item(req: RequestContext) -> Result<String, HandlerError> {
//!     let params = req.path_params()?;
//!     Ok(format!("item {}", params.positional()[0]))
//! }
//!
//! # tokio_test_block(async {
//! let router = Router::new();
//! router.register_exact(Method::GET, "/", handler_fn(hello), &[&Recoverer, &Logger]).unwrap();
//! router.register_pattern(Method::GET, Regex::new(r"^/items/(\d+)$").unwrap(), handler_fn(item), &[]).unwrap();
//!
//! let request = Request::get("/items/7").body(()).unwrap();
//! let response = router.dispatch(request.into()).await.unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod body;
mod error;
mod handler;
mod method;
mod request;
mod responder;

pub mod middleware;
pub mod router;

pub use body::ResponseBody;
pub use error::HandlerError;
pub use error::RouteError;
pub use handler::handler_fn;
pub use handler::BoxedHandler;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use method::RouteMethod;
pub use request::PathParams;
pub use request::RequestContext;
pub use responder::Responder;
pub use router::Router;
