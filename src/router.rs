//! Route table for the contact-us service.
//!
//! The surface is fixed and small, so routes are a plain enum matched on
//! `(Method, path)` rather than a pattern tree.

use http::Method;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `GET /contact_us`
    Index,
    /// `POST /contact_us`
    Submit,
    /// `GET /contact_us/thank_you`
    ThankYou,
    /// `GET /health`
    Health,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Index, Route::Submit, Route::ThankYou, Route::Health];

    pub fn method(&self) -> Method {
        match self {
            Route::Submit => Method::POST,
            Route::Index | Route::ThankYou | Route::Health => Method::GET,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Index | Route::Submit => "/contact_us",
            Route::ThankYou => crate::controller::THANK_YOU_PATH,
            Route::Health => "/health",
        }
    }

    pub fn handler_name(&self) -> &'static str {
        match self {
            Route::Index => "contact_us#index",
            Route::Submit => "contact_us#submit",
            Route::ThankYou => "contact_us#thank_you",
            Route::Health => "health",
        }
    }
}

/// Outcome of looking a request up in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution {
    Matched(Route),
    /// The path exists but not for this method; carries the `Allow` header value.
    MethodNotAllowed(&'static str),
    NotFound,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Router
    }

    /// Resolve `method` and `path` (without query string) to a route.
    ///
    /// A single trailing slash is ignored, so `/contact_us/` matches
    /// `/contact_us`. `HEAD` is answered like `GET`.
    pub fn route(&self, method: &Method, path: &str) -> RouteResolution {
        let path = normalize(path);
        let method = if *method == Method::HEAD {
            Method::GET
        } else {
            method.clone()
        };

        let mut path_known = false;
        for route in Route::ALL {
            if route.path() != path {
                continue;
            }
            path_known = true;
            if route.method() == method {
                debug!(handler = route.handler_name(), path, "Route matched");
                return RouteResolution::Matched(route);
            }
        }

        if path_known {
            RouteResolution::MethodNotAllowed(allow_header(path))
        } else {
            RouteResolution::NotFound
        }
    }
}

fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

fn allow_header(path: &str) -> &'static str {
    if path == "/contact_us" {
        "Allow: GET, HEAD, POST"
    } else {
        "Allow: GET, HEAD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        let router = Router::new();
        let cases = [
            (Method::GET, "/contact_us", RouteResolution::Matched(Route::Index)),
            (Method::HEAD, "/contact_us", RouteResolution::Matched(Route::Index)),
            (Method::POST, "/contact_us", RouteResolution::Matched(Route::Submit)),
            (Method::POST, "/contact_us/", RouteResolution::Matched(Route::Submit)),
            (
                Method::GET,
                "/contact_us/thank_you",
                RouteResolution::Matched(Route::ThankYou),
            ),
            (Method::GET, "/health", RouteResolution::Matched(Route::Health)),
            (
                Method::DELETE,
                "/contact_us",
                RouteResolution::MethodNotAllowed("Allow: GET, HEAD, POST"),
            ),
            (
                Method::POST,
                "/contact_us/thank_you",
                RouteResolution::MethodNotAllowed("Allow: GET, HEAD"),
            ),
            (Method::GET, "/", RouteResolution::NotFound),
            (Method::GET, "/contact_us//", RouteResolution::NotFound),
            (Method::GET, "/contact", RouteResolution::NotFound),
        ];
        for (method, path, expected) in cases {
            assert_eq!(router.route(&method, path), expected, "{method} {path}");
        }
    }

    #[test]
    fn test_routes_are_unique() {
        for (i, a) in Route::ALL.iter().enumerate() {
            for b in &Route::ALL[i + 1..] {
                assert!(
                    a.method() != b.method() || a.path() != b.path(),
                    "{a:?} and {b:?} collide"
                );
            }
        }
    }
}
