use crate::body::ResponseBody;
use crate::responder::Responder;
use crate::{HandlerError, RequestContext};
use async_trait::async_trait;
use http::Response;
use std::sync::Arc;

/// Something that turns a request into a response.
///
/// Failures are returned, not raised: a handler reports an abnormal termination with `Err`,
/// and a [`Recoverer`](crate::middleware::Recoverer) layer can turn it into a response.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: RequestContext) -> Result<Response<ResponseBody>, HandlerError>;
}

/// A shared, type-erased handler as stored in the routing table.
pub type BoxedHandler = Arc<dyn RequestHandler>;

/// Adapts an async fn taking the [`RequestContext`] into a [`RequestHandler`]
pub struct FnHandler<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Creates a [`BoxedHandler`] from an async fn or closure.
///
/// ```
/// use remux::{handler_fn, HandlerError, RequestContext};
///
/// async fn hello(_req: RequestContext) -> Result<&'static str, HandlerError> {
///     Ok("hello world")
/// }
///
/// let handler = handler_fn(hello);
/// ```
pub fn handler_fn<F, Fut, R, E>(f: F) -> BoxedHandler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Responder + 'static,
    E: Into<HandlerError> + 'static,
{
    Arc::new(FnHandler { f })
}

#[async_trait]
impl<F, Fut, R, E> RequestHandler for FnHandler<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Responder + 'static,
    E: Into<HandlerError> + 'static,
{
    async fn invoke(&self, req: RequestContext) -> Result<Response<ResponseBody>, HandlerError> {
        match (self.f)(req).await {
            Ok(responder) => Ok(responder.response_to()),
            Err(e) => Err(e.into()),
        }
    }
}
