use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use url::Url;

use crate::error::ApiError;

const KNOWN_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

// Unreserved characters and `/` pass through; everything else is escaped.
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A named substitution value for a route template.
///
/// Text values are percent-encoded; numbers pass through unescaped.
#[derive(Debug, Clone)]
pub enum PathParam {
    Text(String),
    Number(i64),
}

impl PathParam {
    fn render(&self) -> String {
        match self {
            Self::Text(value) => utf8_percent_encode(value, PATH_SAFE).to_string(),
            Self::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for PathParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PathParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for PathParam {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for PathParam {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for PathParam {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// The location and method of a request.
///
/// Holds an HTTP method token and a path template with named `{placeholder}`
/// segments. Untrusted data belongs in the parameters, where it is escaped;
/// never format it into the template itself.
///
/// An unknown method token is not rejected here: it is logged and sent as-is,
/// anticipating a server-side rejection.
#[derive(Debug, Clone)]
pub struct Route {
    method: String,
    path: String,
    params: Vec<(&'static str, PathParam)>,
}

impl Route {
    pub fn new(method: &str, path: impl Into<String>) -> Self {
        if !KNOWN_METHODS.contains(&method.to_ascii_uppercase().as_str()) {
            log::warn!("unknown HTTP method '{method}', expect the server to reject this request");
        }

        Self {
            method: method.to_string(),
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Binds a named placeholder to a value.
    pub fn param(mut self, name: &'static str, value: impl Into<PathParam>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Formats the template and resolves it against `base`.
    pub fn resolve(&self, base: &Url) -> Result<ResolvedRoute, ApiError> {
        let mut path = self.path.clone();
        for (name, value) in &self.params {
            path = path.replace(&format!("{{{name}}}"), &value.render());
        }

        if path.contains('{') {
            return Err(ApiError::InvalidArgument(format!(
                "route '{}' still contains unfilled placeholders after substitution: '{path}'",
                self.path
            )));
        }

        let method = Method::from_bytes(self.method.as_bytes()).map_err(|_| {
            ApiError::InvalidArgument(format!("'{}' is not a valid HTTP method token", self.method))
        })?;

        let url = base.join(&path).map_err(|e| {
            ApiError::InvalidArgument(format!("cannot resolve path '{path}' against '{base}': {e}"))
        })?;

        Ok(ResolvedRoute { method, url })
    }
}

/// A fully formed request target.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub method: Method,
    pub url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox_base() -> Url {
        Url::parse("https://connect.squareupsandbox.com/v2/").unwrap()
    }

    #[test]
    fn test_format() {
        let route = Route::new("GET", "customers/{user}/{value}")
            .param("user", "Genetical")
            .param("value", 10_i64)
            .resolve(&sandbox_base())
            .unwrap();

        assert_eq!(
            route.url.as_str(),
            "https://connect.squareupsandbox.com/v2/customers/Genetical/10"
        );
        assert_eq!(route.method, Method::GET);
    }

    #[test]
    fn test_string_params_are_percent_encoded() {
        let route = Route::new("GET", "customers/{customer_id}")
            .param("customer_id", "id with spaces/and?marks")
            .resolve(&sandbox_base())
            .unwrap();

        assert_eq!(
            route.url.as_str(),
            "https://connect.squareupsandbox.com/v2/customers/id%20with%20spaces/and%3Fmarks"
        );
    }

    #[test]
    fn test_numeric_params_pass_through() {
        let route = Route::new("GET", "customers/{page}")
            .param("page", 42_i64)
            .resolve(&sandbox_base())
            .unwrap();

        assert!(route.url.as_str().ends_with("/customers/42"));
    }

    #[test]
    fn test_unfilled_placeholder_is_rejected() {
        let result = Route::new("GET", "customers/{customer_id}").resolve(&sandbox_base());
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_method_still_resolves() {
        // Unknown but syntactically valid tokens go out as extension methods
        let route = Route::new("FETCH", "customers").resolve(&sandbox_base()).unwrap();
        assert_eq!(route.method.as_str(), "FETCH");
    }

    #[test]
    fn test_production_base() {
        let base = Url::parse("https://connect.squareup.com/v2/").unwrap();
        let route = Route::new("POST", "customers/search").resolve(&base).unwrap();
        assert_eq!(
            route.url.as_str(),
            "https://connect.squareup.com/v2/customers/search"
        );
    }
}
