use crate::handler::BoxedHandler;
use crate::{PathParams, RouteError, RouteMethod};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered routes, split into an exact index and an ordered list of pattern routes.
///
/// Exact keys compare as strings. Pattern keys compare by identity of the compiled pattern, so
/// two patterns with the same source text registered separately are two distinct routes.
#[derive(Default)]
pub(crate) struct RoutingTable {
    exact: HashMap<RouteMethod, HashMap<String, BoxedHandler>>,
    pattern: HashMap<RouteMethod, Vec<PatternRoute>>,
}

struct PatternRoute {
    pattern: Arc<Regex>,
    handler: BoxedHandler,
}

/// A handler picked by [`RoutingTable::lookup`], with the parameters of a pattern match
pub(crate) type Resolved = (BoxedHandler, Option<PathParams>);

impl RoutingTable {
    pub(crate) fn insert_exact(&mut self, method: RouteMethod, path: &str, handler: BoxedHandler) -> Result<(), RouteError> {
        let paths = self.exact.entry(method).or_default();
        if paths.contains_key(path) {
            return Err(RouteError::AmbiguousMapping);
        }

        paths.insert(path.to_owned(), handler);
        Ok(())
    }

    pub(crate) fn insert_pattern(
        &mut self,
        method: RouteMethod,
        pattern: Arc<Regex>,
        handler: BoxedHandler,
    ) -> Result<(), RouteError> {
        let routes = self.pattern.entry(method).or_default();
        if routes.iter().any(|route| Arc::ptr_eq(&route.pattern, &pattern)) {
            return Err(RouteError::AmbiguousMapping);
        }

        routes.push(PatternRoute { pattern, handler });
        Ok(())
    }

    /// Exact routes win over pattern routes; pattern routes are tried in registration order
    /// and the first match is taken.
    pub(crate) fn lookup(&self, method: RouteMethod, path: &str) -> Option<Resolved> {
        if let Some(handler) = self.exact.get(&method).and_then(|paths| paths.get(path)) {
            return Some((Arc::clone(handler), None));
        }

        self.pattern.get(&method)?.iter().find_map(|route| {
            route.pattern.captures(path).map(|captures| {
                let params = PathParams::from_captures(&route.pattern, &captures);
                (Arc::clone(&route.handler), Some(params))
            })
        })
    }

    pub(crate) fn len(&self) -> usize {
        let exact = self.exact.values().map(HashMap::len).sum::<usize>();
        let pattern = self.pattern.values().map(Vec::len).sum::<usize>();
        exact + pattern
    }
}
