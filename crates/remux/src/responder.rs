//! Conversion of handler return values into HTTP responses.
//!
//! [`Responder`] is what lets [`handler_fn`](crate::handler_fn) accept plain async functions
//! returning strings, status/content tuples or prebuilt responses.

use crate::body::ResponseBody;
use http::{HeaderValue, Response, StatusCode};

const TEXT_PLAIN_UTF_8: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");

/// A trait for types that can be converted into HTTP responses.
pub trait Responder {
    fn response_to(self) -> Response<ResponseBody>;
}

/// None case returns an empty response.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

/// Pre-built responses pass through, only the body is converted.
impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

/// Sets the status code on top of the wrapped content.
impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to();
        *response.status_mut() = status;
        response
    }
}

impl Responder for StatusCode {
    fn response_to(self) -> Response<ResponseBody> {
        (self, ()).response_to()
    }
}

impl Responder for () {
    fn response_to(self) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self) -> Response<ResponseBody> {
        text_response(ResponseBody::from(self))
    }
}

impl Responder for String {
    fn response_to(self) -> Response<ResponseBody> {
        text_response(ResponseBody::from(self))
    }
}

fn text_response(body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    response.headers_mut().insert(http::header::CONTENT_TYPE, TEXT_PLAIN_UTF_8);
    response
}
