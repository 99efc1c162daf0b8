use crate::body::ResponseBody;
use crate::handler::{BoxedHandler, RequestHandler};
use crate::middleware::Middleware;
use crate::responder::Responder;
use crate::{HandlerError, RequestContext};
use async_trait::async_trait;
use http::{Response, StatusCode};
use std::sync::Arc;
use tracing::error;

/// Recovery boundary: turns a failed inner handler into a `500 Internal Server Error`
/// whose body is the error message.
///
/// Register it first in the middleware list so it is the outermost layer and also covers
/// failures raised by the other middlewares.
#[derive(Debug, Default, Clone, Copy)]
pub struct Recoverer;

struct RecovererHandler {
    inner: BoxedHandler,
}

impl Middleware for Recoverer {
    fn wrap(&self, handler: BoxedHandler) -> BoxedHandler {
        Arc::new(RecovererHandler { inner: handler })
    }
}

#[async_trait]
impl RequestHandler for RecovererHandler {
    async fn invoke(&self, req: RequestContext) -> Result<Response<ResponseBody>, HandlerError> {
        let method = req.method().clone();
        let path = req.path().to_owned();

        match self.inner.invoke(req).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(%method, %path, cause = %e, "handler failed, responding with internal server error");
                Ok((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).response_to())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler_fn;
    use crate::middleware::{compose, Logger};
    use http::Request;

    fn context(path: &str) -> RequestContext {
        Request::get(path).body(()).unwrap().into()
    }

    #[tokio::test]
    async fn test_recover_failure() {
        let handler = handler_fn(|_req: RequestContext| async { Err::<(), _>("panic example") });
        let handler = compose(handler, &[&Recoverer]);

        let mut response = handler.invoke(context("/panic")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_mut().take_bytes(), "panic example");
    }

    #[tokio::test]
    async fn test_no_failure_untouched() {
        let handler = handler_fn(|_req: RequestContext| async { Ok::<_, HandlerError>(()) });
        let handler = compose(handler, &[&Recoverer]);

        let mut response = handler.invoke(context("/nopanic")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body_mut().take_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_outermost_recoverer_covers_inner_layers() {
        let handler = handler_fn(|_req: RequestContext| async { Err::<(), _>("some panic") });
        let handler = compose(handler, &[&Recoverer, &Logger]);

        let mut response = handler.invoke(context("/test")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_mut().take_bytes(), "some panic");
    }

    #[tokio::test]
    async fn test_innermost_recoverer_does_not_cover_outer_layers() {
        let failing_layer = crate::middleware::middleware_fn(|_inner| {
            handler_fn(|_req: RequestContext| async { Err::<(), _>("outer failure") })
        });
        let handler = handler_fn(|_req: RequestContext| async { Ok::<_, HandlerError>(()) });
        let handler = compose(handler, &[&failing_layer, &Recoverer]);

        let err = handler.invoke(context("/")).await.unwrap_err();

        assert_eq!(err.to_string(), "outer failure");
    }
}
