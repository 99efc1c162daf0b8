use http::Method;
use regex::Regex;
use remux::{handler_fn, HandlerError, RequestContext, Router};

/// A request to dispatch against [`routing_table`], named after the path the router takes.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    method: &'static str,
    path: &'static str,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, method: &'static str, path: &'static str) -> Self {
        Self { name, group, method, path }
    }

    pub fn exact(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Exact, "GET", path)
    }

    pub fn pattern(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Pattern, "GET", path)
    }

    pub fn fallback(name: &'static str, method: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Fallback, method, path)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn method(&self) -> Method {
        Method::from_bytes(self.method.as_bytes()).unwrap_or_default()
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Exact,
    Pattern,
    Fallback,
}

/// Builds a router with `size` exact routes `/exact/{i}` and `size` pattern routes
/// `^/pattern/{i}/(?P<id>\d+)$`, all for GET.
///
/// # Panics
///
/// Panics if a route cannot be registered, which only happens for a broken fixture.
pub fn routing_table(size: usize) -> Router {
    let router = Router::new();
    for i in 0..size {
        let exact = handler_fn(|_req: RequestContext| async { Ok::<_, HandlerError>("exact") });
        router.register_exact("GET", &format!("/exact/{i}"), exact, &[]).expect("exact fixture route");

        let pattern = Regex::new(&format!(r"^/pattern/{i}/(?P<id>\d+)$")).expect("pattern fixture");
        let by_pattern = handler_fn(|req: RequestContext| async move {
            let id = req.path_params()?.named("id").unwrap_or_default().to_owned();
            Ok::<_, HandlerError>(id)
        });
        router.register_pattern("GET", pattern, by_pattern, &[]).expect("pattern fixture route");
    }
    router
}
