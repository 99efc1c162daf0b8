use std::error::Error;
use thiserror::Error;

/// The error a [`RequestHandler`](crate::handler::RequestHandler) may fail with.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Outcomes of router operations other than success.
///
/// Registration errors leave the routing table untouched, so the caller is free to retry
/// with corrected input. [`RouteError::NoParameters`] is the regular answer of
/// [`RequestContext::path_params`](crate::RequestContext::path_params) for requests that were
/// not resolved through a pattern route.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid path")]
    InvalidPath,

    #[error("handler is nil")]
    NilHandler,

    #[error("ambiguous mapping")]
    AmbiguousMapping,

    #[error("no params")]
    NoParameters,
}
