//! Request scope handed to every handler, and the path parameters a pattern route extracts.
//!
//! - `RequestContext`: owns the request head and an explicit slot for path parameters
//! - `PathParams`: the named and positional capture groups of a matched pattern route

use crate::RouteError;
use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

/// The processing scope of a single request.
///
/// It is created by the caller of [`Router::dispatch`](crate::Router::dispatch), receives
/// [`PathParams`] when the request is resolved through a pattern route, and is moved into the
/// selected handler. Dropping it ends the request scope, parameters included.
#[derive(Debug)]
pub struct RequestContext {
    head: Parts,
    path: String,
    path_params: Option<PathParams>,
}

impl RequestContext {
    /// Creates a new RequestContext from the given request head, with no parameters attached.
    ///
    /// The path is percent-decoded once here; a path that does not decode to UTF-8 is kept raw.
    pub fn new(head: Parts) -> Self {
        let raw = head.uri.path();
        let path = urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned);
        Self { head, path, path_params: None }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.head.method
    }

    /// Returns the URI of the request as received, percent-encoding included
    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    /// Returns the percent-decoded path of the request URI, which is what routes are matched against
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.head.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Returns the parameters captured by the pattern route this request was resolved through.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoParameters`] when the request was resolved through an exact route
    /// or the fallback handler. This is an expected outcome, not a router failure.
    pub fn path_params(&self) -> Result<&PathParams, RouteError> {
        self.path_params.as_ref().ok_or(RouteError::NoParameters)
    }

    pub(crate) fn attach_path_params(&mut self, path_params: PathParams) {
        self.path_params = Some(path_params);
    }
}

impl From<Parts> for RequestContext {
    fn from(head: Parts) -> Self {
        Self::new(head)
    }
}

impl<B> From<Request<B>> for RequestContext {
    fn from(request: Request<B>) -> Self {
        Self::new(request.into_parts().0)
    }
}

/// Path parameters captured by a pattern route.
///
/// `named` maps every named capture group to its matched text, `positional` holds the text of
/// every capture group (named or not) in declaration order. Index 0 of `positional` is the first
/// group, not the whole match. A group that did not participate in the match yields `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    named: HashMap<String, String>,
    positional: Vec<String>,
}

impl PathParams {
    pub(crate) fn from_captures(pattern: &Regex, captures: &Captures<'_>) -> Self {
        let positional = captures
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect::<Vec<_>>();

        let named = pattern
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| name.filter(|name| !name.is_empty()).map(|name| (index, name)))
            .map(|(index, name)| {
                let value = captures.get(index).map_or("", |m| m.as_str());
                (name.to_owned(), value.to_owned())
            })
            .collect::<HashMap<_, _>>();

        Self { named, positional }
    }

    /// Gets the value of a named capture group
    /// Returns None if the pattern declares no group with this name
    #[inline]
    pub fn named(&self, key: impl AsRef<str>) -> Option<&str> {
        self.named.get(key.as_ref()).map(String::as_str)
    }

    /// Returns all named capture groups
    #[inline]
    pub fn named_map(&self) -> &HashMap<String, String> {
        &self.named
    }

    /// Returns every capture group in declaration order
    #[inline]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Returns the number of capture groups
    #[inline]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Returns true if the pattern declared no capture groups
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }
}
