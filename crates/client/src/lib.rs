//! Compliance back-office HTTP client
//!
//! A typed client for the compliance backend REST API: cases and queues,
//! transaction monitoring, risk analytics, regulatory reports, limits and the
//! compliance calendar.
//!
//! # Quick Start
//!
//! ```no_run
//! use aml_console_client::ComplianceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aml_console_client::Error> {
//!     let client = ComplianceClient::builder("http://localhost:8080/api/v1")
//!         .xsrf_token("3f0c...")
//!         .build()?;
//!
//!     for case in client.list_cases(Some("ESCALATED")).await? {
//!         println!("{} {}", case.reference(), case.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every request goes through a [`Transport`]. The default is
//! [`HttpTransport`]; [`ComplianceClient::with_transport`] accepts any other
//! implementation, which is how the console is tested without a backend.

mod analytics;
mod calendar;
mod cases;
mod error;
mod limits;
mod monitoring;
mod queues;
mod reporting;
pub mod transport;

pub use error::Error;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the compliance backend.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct ComplianceClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ComplianceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceClient").finish_non_exhaustive()
    }
}

/// Builder for a [`ComplianceClient`] over [`HttpTransport`].
#[derive(Debug)]
pub struct ComplianceClientBuilder {
    base_url: String,
    timeout: Duration,
    xsrf_token: Option<String>,
    session_cookie: Option<String>,
    client: Option<reqwest::Client>,
}

impl ComplianceClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            xsrf_token: None,
            session_cookie: None,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Anti-forgery token echoed as `X-XSRF-TOKEN` on mutating requests.
    #[must_use]
    pub fn xsrf_token(mut self, token: impl Into<String>) -> Self {
        self.xsrf_token = Some(token.into());
        self
    }

    /// Raw `Cookie` header value of an existing session, e.g. `JSESSIONID=...`.
    #[must_use]
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Timeout, cookie store and default headers are then the caller's
    /// responsibility; the XSRF token is still attached per request.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ComplianceClient, Error> {
        let transport = HttpTransport::new(
            &self.base_url,
            self.timeout,
            self.xsrf_token,
            self.session_cookie.as_deref(),
            self.client,
        )?;
        Ok(ComplianceClient::with_transport(Arc::new(transport)))
    }
}

impl ComplianceClient {
    /// Client with default settings over HTTP.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        ComplianceClientBuilder::new(base_url).build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> ComplianceClientBuilder {
        ComplianceClientBuilder::new(base_url)
    }

    /// Client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a request and fail on a non-2xx status.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let method = request.method;
        let uri = request.uri();
        let response = self.transport.send(request).await?;
        debug!(%method, %uri, status = response.status, "backend responded");
        response.error_for_status()
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        self.execute(request).await?.json()
    }

    /// Fetch a collection endpoint; see [`Listing`].
    async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Vec<T>, Error> {
        Ok(self.fetch::<Listing<T>>(request).await?.0)
    }

    /// Issue a mutating request whose response body is not used.
    async fn command(
        &self,
        method: Method,
        path: String,
        body: Option<serde_json::Value>,
    ) -> Result<(), Error> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.execute(request).await.map(drop)
    }
}

/// Serialize a request body for [`ApiRequest::body`].
fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Configuration(format!("request body: {e}")))
}

/// A collection response.
///
/// The backend answers with a bare array on most endpoints and a Spring page
/// (`{"content": [...]}`) on some; anything else is read as empty.
struct Listing<T>(Vec<T>);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Listing<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let items = match value {
            items @ serde_json::Value::Array(_) => items,
            serde_json::Value::Object(mut map) => match map.remove("content") {
                Some(content @ serde_json::Value::Array(_)) => content,
                _ => return Ok(Self(Vec::new())),
            },
            _ => return Ok(Self(Vec::new())),
        };
        serde_json::from_value(items)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::{ApiRequest, ApiResponse, ComplianceClient, Error, Transport};

    /// Answers every request with the same response and remembers requests.
    pub struct Canned {
        pub response: ApiResponse,
        pub seen: Mutex<Vec<ApiRequest>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    pub fn client(status: u16, body: &'static str) -> (ComplianceClient, Arc<Canned>) {
        let canned = Arc::new(Canned {
            response: ApiResponse::new(status, body),
            seen: Mutex::new(Vec::new()),
        });
        (ComplianceClient::with_transport(canned.clone()), canned)
    }

    impl Canned {
        pub fn last(&self) -> ApiRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }
}
