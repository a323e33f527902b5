//! Request plans: one fully-resolved outgoing call

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// HTTP methods issued by the simulated users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    /// Get the string representation of the HTTP method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request ready to send: method, path with query string, the display
/// name statistics are grouped under, an optional JSON body and an optional
/// bearer token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub path: String,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer: Option<String>,
}

impl RequestPlan {
    pub fn get(path: impl Into<String>, name: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            name,
            body: None,
            bearer: None,
        }
    }

    pub fn post_json(path: impl Into<String>, name: &'static str, body: JsonValue) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            name,
            body: Some(body),
            bearer: None,
        }
    }

    /// Authorize with `token` when there is one
    pub fn with_bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_string);
        self
    }

    /// `Authorization` header value, if the request is authorized
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {}", token))
    }

    /// Path without the query string
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// Value of a query parameter, decoded
    pub fn query_param(&self, key: &str) -> Option<String> {
        let (_, query) = self.path.split_once('?')?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl fmt::Display for RequestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if self.route() != self.name {
            write!(f, " [{}]", self.name)?;
        }
        if let Some(ref body) = self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

/// Append form-urlencoded query pairs to a path
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}?{}", path, query)
}
