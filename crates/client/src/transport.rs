//! The HTTP seam between [`ComplianceClient`](crate::ComplianceClient) and
//! the backend.
//!
//! Endpoint modules build an [`ApiRequest`]; a [`Transport`] turns it into an
//! [`ApiResponse`]. [`HttpTransport`] is the production implementation; tests
//! substitute an in-memory one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Error;

/// Characters left unescaped in query components and path segments.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path segment or query component.
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method must carry the anti-forgery token.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path without a leading slash, segments already encoded.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus encoded query string, e.g. `cases/7/network?depth=2`.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// Raw status and body; status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Best human-readable description of a failed response.
    ///
    /// Prefers a `message` or `error` string in a JSON body, then the body
    /// text itself, then a generic line with the status.
    pub fn error_message(&self) -> String {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(&self.body) {
            for key in ["message", "error"] {
                if let Some(serde_json::Value::String(s)) = map.get(key)
                    && !s.trim().is_empty()
                {
                    return s.clone();
                }
            }
        }
        let text = String::from_utf8_lossy(&self.body);
        let text = text.trim();
        if text.is_empty() || text.starts_with('{') {
            format!("request failed with status {}", self.status)
        } else {
            text.to_owned()
        }
    }

    /// `Ok(self)` for 2xx, otherwise [`Error::Http`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Http {
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

/// Sends one request and returns whatever the backend answered.
///
/// Implementations only report transport-level failures as errors; a non-2xx
/// status is a normal [`ApiResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error>;
}

/// [`Transport`] over `reqwest` with the browser-session conventions the
/// backend expects.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    xsrf_token: Option<String>,
}

impl HttpTransport {
    pub(crate) fn new(
        base_url: &str,
        timeout: Duration,
        xsrf_token: Option<String>,
        session_cookie: Option<&str>,
        client: Option<reqwest::Client>,
    ) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let client = match client {
            Some(c) => c,
            None => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    "X-Requested-With",
                    HeaderValue::from_static("XMLHttpRequest"),
                );
                if let Some(cookie) = session_cookie {
                    let value = HeaderValue::from_str(cookie)
                        .map_err(|e| Error::Configuration(format!("session cookie: {e}")))?;
                    headers.insert(COOKIE, value);
                }
                reqwest::Client::builder()
                    .timeout(timeout)
                    .cookie_store(true)
                    .default_headers(headers)
                    .build()
                    .map_err(|e| Error::Configuration(e.to_string()))?
            }
        };

        Ok(Self {
            client,
            base_url,
            xsrf_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let url = format!("{}/{}", self.base_url, request.uri());
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header("X-Requested-With", "XMLHttpRequest");
        if request.method.is_mutating()
            && let Some(token) = &self.xsrf_token
        {
            builder = builder.header("X-XSRF-TOKEN", token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!(%url, status, bytes = body.len(), "response received");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_encodes_query_components() {
        let req = ApiRequest::get("analytics/risk/trends")
            .query("startDate", "2024-03-01T00:00:00.000Z")
            .query("note", "a b&c");
        assert_eq!(
            req.uri(),
            "analytics/risk/trends?startDate=2024-03-01T00%3A00%3A00.000Z&note=a%20b%26c"
        );
    }

    #[test]
    fn uri_without_query_is_path() {
        assert_eq!(ApiRequest::get("limits/global").uri(), "limits/global");
    }

    #[test]
    fn only_get_is_safe() {
        assert!(!Method::Get.is_mutating());
        for m in [Method::Post, Method::Put, Method::Patch, Method::Delete] {
            assert!(m.is_mutating(), "{m}");
        }
    }

    #[test]
    fn error_message_prefers_json_message() {
        let resp = ApiResponse::new(400, r#"{"message":"Queue name already exists"}"#);
        assert_eq!(resp.error_message(), "Queue name already exists");
        let resp = ApiResponse::new(500, r#"{"error":"boom"}"#);
        assert_eq!(resp.error_message(), "boom");
    }

    #[test]
    fn error_message_falls_back_to_text_then_status() {
        assert_eq!(ApiResponse::new(502, "Bad Gateway").error_message(), "Bad Gateway");
        assert_eq!(
            ApiResponse::new(404, "").error_message(),
            "request failed with status 404"
        );
        assert_eq!(
            ApiResponse::new(409, r#"{"detail":1}"#).error_message(),
            "request failed with status 409"
        );
    }

    #[test]
    fn error_for_status() {
        assert!(ApiResponse::new(204, "").error_for_status().is_ok());
        let err = ApiResponse::new(403, "Forbidden").error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");
    }

    #[test]
    fn json_maps_parse_failures() {
        let resp = ApiResponse::new(200, "not json");
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn http_transport_rejects_bad_base_url() {
        let err = HttpTransport::new("localhost:8080", Duration::from_secs(5), None, None, None)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        let ok = HttpTransport::new("http://localhost:8080/", Duration::from_secs(5), None, None, None)
            .unwrap();
        assert_eq!(ok.base_url(), "http://localhost:8080");
    }
}
