use crate::error::SetupError;
use http::Method;
use regex::Regex;
use remux::middleware::{Logger, Recoverer};
use remux::{handler_fn, HandlerError, RequestContext, Router};

async fn always_fails(_req: RequestContext) -> Result<(), HandlerError> {
    Err("some panic".into())
}

async fn user(req: RequestContext) -> Result<String, HandlerError> {
    let params = req.path_params()?;
    Ok(format!("user {}\r\n", params.named("id").unwrap_or_default()))
}

/// Builds the router the server binary exposes.
pub fn router() -> Result<Router, SetupError> {
    let router = Router::new();

    router.register_exact(Method::GET, "/test", handler_fn(always_fails), &[&Recoverer, &Logger])?;
    router.register_pattern(Method::GET, Regex::new(r"^/users/(?P<id>\d+)$")?, handler_fn(user), &[&Recoverer, &Logger])?;

    Ok(router)
}
