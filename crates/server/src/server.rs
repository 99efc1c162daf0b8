use crate::codec::HttpCodec;
use crate::error::CodecError;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::request::Parts;
use http::{header, Response, StatusCode, Version};
use remux::{RequestContext, Router};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing::{error, info, warn};

/// Accepts connections and feeds every request into one shared [`Router`].
#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(router: Router, host: impl Into<String>, port: u16) -> Self {
        Self { router: Arc::new(router), host: host.into(), port }
    }

    /// Binds the configured address and serves until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns the error of binding the listener.
    pub async fn start(self) -> io::Result<()> {
        let tcp_listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        info!(address = ?tcp_listener.local_addr()?, "start listening");

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let router = Arc::clone(&self.router);

            tokio::spawn(async move {
                match serve_connection(&router, tcp_stream).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "connection has error, connection shutdown");
                    }
                }
            });
        }
    }
}

/// Processes the requests of one connection in order until the peer closes it or asks to.
///
/// # Errors
///
/// Returns framing and io errors; the connection is dropped afterwards.
pub async fn serve_connection<T>(router: &Router, io: T) -> Result<(), CodecError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(io, HttpCodec::default());

    while let Some(head) = framed.next().await {
        let head = head?;
        let close = wants_close(&head);

        let response = respond(router, head).await;
        framed.send(response).await?;

        if close {
            break;
        }
    }

    Ok(())
}

async fn respond(router: &Router, head: Parts) -> Response<Bytes> {
    match router.dispatch(RequestContext::new(head)).await {
        Ok(response) => response.map(|mut body| body.take_bytes()),
        Err(e) => {
            error!(cause = %e, "unrecovered handler failure, responding with internal server error");
            let mut response = Response::new(Bytes::new());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

fn wants_close(head: &Parts) -> bool {
    let connection = head.headers.get(header::CONNECTION).map(http::HeaderValue::as_bytes);
    match head.version {
        Version::HTTP_10 => !connection.is_some_and(|value| value.eq_ignore_ascii_case(b"keep-alive")),
        _ => connection.is_some_and(|value| value.eq_ignore_ascii_case(b"close")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remux::middleware::{Logger, Recoverer};
    use remux::{handler_fn, HandlerError};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn router() -> Router {
        let router = Router::new();
        let hello = handler_fn(|_req: RequestContext| async { Ok::<_, HandlerError>("hello") });
        router.register_exact("GET", "/", hello, &[&Recoverer, &Logger]).unwrap();
        let failing = handler_fn(|_req: RequestContext| async { Err::<(), _>("unrecovered") });
        router.register_exact("GET", "/fail", failing, &[]).unwrap();
        router
    }

    async fn exchange(request: &'static [u8]) -> String {
        let router = router();
        let (mut client, server) = tokio::io::duplex(4096);

        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();
        serve_connection(&router, server).await.unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        output
    }

    #[tokio::test]
    async fn test_keep_alive_requests_in_order() {
        let output = exchange(b"GET / HTTP/1.1\r\n\r\nGET /missing HTTP/1.1\r\n\r\n").await;

        assert_eq!(
            output,
            "HTTP/1.1 200 OK\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: 5\r\n\r\nhello\
             HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn test_connection_close_stops_processing() {
        let output = exchange(b"GET /missing HTTP/1.1\r\nConnection: close\r\n\r\nGET / HTTP/1.1\r\n\r\n").await;

        assert_eq!(output, "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n");
    }

    #[tokio::test]
    async fn test_unrecovered_failure_is_internal_server_error() {
        let output = exchange(b"GET /fail HTTP/1.0\r\n\r\n").await;

        assert_eq!(output, "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\r\n");
    }
}
