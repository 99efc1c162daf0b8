//! HTTP/1.1 framing for the server connection loop.
//!
//! [`HttpCodec`] decodes request heads with `httparse` and encodes complete responses.
//! Request bodies are not handed to the router: a body announced by `Content-Length` is
//! consumed and dropped before the next request head is decoded, and chunked request bodies
//! are rejected.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB

use crate::error::CodecError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use http::request::Parts;
use http::{header, Request, Response, Version};
use httparse::Status;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Initial buffer size allocated for response serialization
const INIT_RESPONSE_SIZE: usize = 1024;

#[derive(Debug, Default)]
pub struct HttpCodec {
    /// body bytes of the previous request that still have to be dropped
    skip: usize,
}

impl Decoder for HttpCodec {
    type Item = Parts;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.skip > 0 {
            let n = self.skip.min(src.len());
            src.advance(n);
            self.skip -= n;
            if self.skip > 0 {
                return Ok(None);
            }
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let body_offset = match req.parse(src).map_err(|e| match e {
            httparse::Error::TooManyHeaders => CodecError::TooManyHeaders { max_num: MAX_HEADER_NUM },
            e => CodecError::invalid_header(e),
        })? {
            Status::Complete(body_offset) => body_offset,
            Status::Partial if src.len() > MAX_HEADER_BYTES => {
                return Err(CodecError::too_large_header(src.len(), MAX_HEADER_BYTES));
            }
            Status::Partial => return Ok(None),
        };

        if body_offset > MAX_HEADER_BYTES {
            return Err(CodecError::too_large_header(body_offset, MAX_HEADER_BYTES));
        }

        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            v => return Err(CodecError::InvalidVersion(v)),
        };

        let mut builder = Request::builder()
            .method(req.method.ok_or(CodecError::InvalidMethod)?)
            .uri(req.path.ok_or(CodecError::InvalidUri)?)
            .version(version);
        for header in req.headers.iter() {
            builder = builder.header(header.name, header.value);
        }
        let (head, ()) = builder.body(()).map_err(CodecError::invalid_header)?.into_parts();

        if head.headers.contains_key(header::TRANSFER_ENCODING) {
            return Err(CodecError::unsupported_body("transfer-encoding request bodies are not accepted"));
        }
        let content_length = match head.headers.get(header::CONTENT_LENGTH) {
            Some(value) => value
                .to_str()
                .map_err(CodecError::invalid_content_length)?
                .trim()
                .parse::<usize>()
                .map_err(CodecError::invalid_content_length)?,
            None => 0,
        };

        trace!(method = %head.method, uri = %head.uri, body_offset, content_length, "decoded request head");
        src.advance(body_offset);
        self.skip = content_length;
        Ok(Some(head))
    }
}

impl Encoder<Response<Bytes>> for HttpCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = item.into_parts();

        dst.reserve(INIT_RESPONSE_SIZE + body.len());
        let mut writer = dst.writer();
        write!(writer, "HTTP/1.1 {} {}\r\n", parts.status.as_str(), parts.status.canonical_reason().unwrap_or(""))?;
        for (name, value) in parts.headers.iter().filter(|(name, _)| **name != header::CONTENT_LENGTH) {
            writer.write_all(name.as_ref())?;
            writer.write_all(b": ")?;
            writer.write_all(value.as_ref())?;
            writer.write_all(b"\r\n")?;
        }
        write!(writer, "content-length: {}\r\n\r\n", body.len())?;

        let dst = writer.into_inner();
        dst.put_slice(&body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};

    #[test]
    fn test_decode_partial_then_complete() {
        let mut codec = HttpCodec::default();
        let mut buf = BytesMut::from("GET /test/2 HTTP/1.1\r\nHost: localhost\r\n");

        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\r\n");
        let head = codec.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method, Method::GET);
        assert_eq!(head.uri.path(), "/test/2");
        assert_eq!(head.version, Version::HTTP_11);
        assert_eq!(head.headers[header::HOST], "localhost");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_skips_request_body() {
        let mut codec = HttpCodec::default();
        let mut buf = BytesMut::from("POST /a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloGET /b HTTP/1.1\r\n\r\n");

        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.method, Method::POST);

        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.method, Method::GET);
        assert_eq!(second.uri.path(), "/b");
    }

    #[test]
    fn test_decode_body_split_across_reads() {
        let mut codec = HttpCodec::default();
        let mut buf = BytesMut::from("PUT /a HTTP/1.1\r\nContent-Length: 4\r\n\r\nab");

        assert!(codec.decode(&mut buf).unwrap().is_some());
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"cdDELETE /c HTTP/1.1\r\n\r\n");
        let head = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(head.method, Method::DELETE);
    }

    #[test]
    fn test_decode_rejects_chunked_body() {
        let mut codec = HttpCodec::default();
        let mut buf = BytesMut::from("POST /a HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n");

        assert!(matches!(codec.decode(&mut buf), Err(CodecError::UnsupportedBody { .. })));
    }

    #[test]
    fn test_decode_rejects_large_header() {
        let mut codec = HttpCodec::default();
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nX-Big: ");
        buf.extend_from_slice(&[b'a'; MAX_HEADER_BYTES]);

        assert!(matches!(codec.decode(&mut buf), Err(CodecError::TooLargeHeader { .. })));
    }

    #[test]
    fn test_encode_response() {
        let mut codec = HttpCodec::default();
        let mut response = Response::new(Bytes::from_static(b"panic example"));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(header::CONTENT_TYPE, "text/plain; charset=utf-8".parse().unwrap());

        let mut dst = BytesMut::new();
        codec.encode(response, &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            b"HTTP/1.1 500 Internal Server Error\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: 13\r\n\r\npanic example"
        );
    }
}
