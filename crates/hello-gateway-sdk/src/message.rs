//! Incoming message representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Path parameters extracted from a route template (e.g., `{name}` -> "Alice").
///
/// Values are always strings. A wire message carrying any other JSON type for a
/// path parameter fails to deserialize instead of being coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a path parameter is present.
    ///
    /// # Example
    /// ```ignore
    /// // Route: /hello/{name}, Request: /hello/Alice
    /// assert!(params.contains_key("name"));
    /// ```
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get a path parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert a path parameter, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request metadata the host attaches to every message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// HTTP method (GET, POST, ...)
    pub method: String,

    /// Request URI as received (path plus query string)
    pub request_uri: String,

    /// Path parameters extracted from the matched route
    #[serde(default)]
    pub path_params: PathParams,

    /// Query parameters
    #[serde(default)]
    pub query_params: HashMap<String, String>,

    /// HTTP headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Attributes {
    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Get a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query_params.get(key)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            request_uri: "/".to_string(),
            path_params: PathParams::default(),
            query_params: HashMap::new(),
            headers: HashMap::new(),
        }
    }
}

/// A message delivered to a handler: request attributes plus an optional payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    attributes: Attributes,

    /// Raw request body, if any
    #[serde(default)]
    pub payload: Option<String>,
}

impl Message {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            payload: None,
        }
    }

    /// Build a message that only carries path parameters.
    ///
    /// # Example
    /// ```ignore
    /// let msg = Message::with_path_params([("name", "Alice")]);
    /// ```
    pub fn with_path_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(Attributes {
            path_params: params.into_iter().collect(),
            ..Attributes::default()
        })
    }

    /// Set the payload (builder pattern).
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
