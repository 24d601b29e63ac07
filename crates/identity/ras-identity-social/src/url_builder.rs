//! Deterministic query-string construction.

use std::fmt::Display;

/// Appends query parameters to a base URL in insertion order.
///
/// Keys and values are percent-encoded exactly once when the URL is built, so
/// callers always pass raw values (e.g. `"r_liteprofile r_emailaddress"`, never
/// a pre-encoded `%20` form). Spaces encode as `%20`.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            params: Vec::new(),
        }
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn optional_param(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.base_url.clone();
        }

        let separator = if !self.base_url.contains('?') {
            "?"
        } else if self.base_url.ends_with('?') || self.base_url.ends_with('&') {
            ""
        } else {
            "&"
        };

        format!("{}{}{}", self.base_url, separator, self.query_string())
    }
}
