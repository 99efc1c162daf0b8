use crate::body::ResponseBody;
use crate::handler::{BoxedHandler, RequestHandler};
use crate::middleware::Middleware;
use crate::{HandlerError, RequestContext};
use async_trait::async_trait;
use http::Response;
use std::sync::Arc;
use tracing::info;

/// Logs method and path of every request before handing it to the inner handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

struct LoggerHandler {
    inner: BoxedHandler,
}

impl Middleware for Logger {
    fn wrap(&self, handler: BoxedHandler) -> BoxedHandler {
        Arc::new(LoggerHandler { inner: handler })
    }
}

#[async_trait]
impl RequestHandler for LoggerHandler {
    async fn invoke(&self, req: RequestContext) -> Result<Response<ResponseBody>, HandlerError> {
        info!(method = %req.method(), path = req.path(), "new request");
        self.inner.invoke(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler_fn;
    use crate::middleware::compose;
    use http::{Request, StatusCode};

    #[tokio::test]
    async fn test_logger_passes_through() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let handler = handler_fn(|_req: RequestContext| async { Ok::<_, HandlerError>((StatusCode::CREATED, "done")) });
        let handler = compose(handler, &[&Logger]);

        let req = RequestContext::from(Request::post("/items").body(()).unwrap());
        let mut response = handler.invoke(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body_mut().take_bytes(), "done");
    }

    #[tokio::test]
    async fn test_logger_passes_errors_through() {
        let handler = handler_fn(|_req: RequestContext| async { Err::<(), _>("boom") });
        let handler = compose(handler, &[&Logger]);

        let req = RequestContext::from(Request::get("/").body(()).unwrap());
        let err = handler.invoke(req).await.unwrap_err();

        assert_eq!(err.to_string(), "boom");
    }
}
