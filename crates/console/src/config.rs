//! Configuration for the console.

use std::path::Path;
use std::time::Duration;

use aml_console_core::analytics::MAX_PERIOD_DAYS;
use serde::Deserialize;

use crate::ConsoleError;

/// Backend connection settings and page defaults.
///
/// Loaded from a TOML file, from `AML_CONSOLE_*` environment variables, or
/// built in code; every field has a default except the endpoint, which falls
/// back to a local backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Backend base URL, e.g. `https://aml.example.com/api/v1`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Anti-forgery token echoed on mutating requests.
    #[serde(default)]
    pub xsrf_token: Option<String>,
    /// `Cookie` header of an authenticated session.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Request timeout in seconds; the client default when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Live transaction feed refresh period.
    #[serde(default = "default_live_refresh_secs")]
    pub live_refresh_secs: u64,
    /// Limits stats and transaction-limits table refresh period.
    #[serde(default = "default_limits_refresh_secs")]
    pub limits_refresh_secs: u64,
    /// Default risk-analytics window in days.
    #[serde(default = "default_days")]
    pub analytics_period_days: u32,
    /// Horizon of the upcoming-deadlines list in days.
    #[serde(default = "default_days")]
    pub upcoming_days: u32,
    /// Maximum rows requested for the live feed.
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
    /// Case activities page size.
    #[serde(default = "default_activities_page_size")]
    pub activities_page_size: u32,
    /// Default hop count for the case entity network.
    #[serde(default = "default_network_depth")]
    pub network_depth: u32,
}

fn default_endpoint() -> String {
    "http://localhost:8080/api/v1".to_owned()
}

fn default_live_refresh_secs() -> u64 {
    5
}

fn default_limits_refresh_secs() -> u64 {
    30
}

fn default_days() -> u32 {
    30
}

fn default_feed_limit() -> u32 {
    100
}

fn default_activities_page_size() -> u32 {
    20
}

fn default_network_depth() -> u32 {
    2
}

impl ConsoleConfig {
    /// Create a new configuration with defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            xsrf_token: None,
            session_cookie: None,
            timeout_secs: None,
            live_refresh_secs: default_live_refresh_secs(),
            limits_refresh_secs: default_limits_refresh_secs(),
            analytics_period_days: default_days(),
            upcoming_days: default_days(),
            feed_limit: default_feed_limit(),
            activities_page_size: default_activities_page_size(),
            network_depth: default_network_depth(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `AML_CONSOLE_ENDPOINT` (defaults to `http://localhost:8080/api/v1`)
    /// - `AML_CONSOLE_XSRF_TOKEN`, `AML_CONSOLE_SESSION_COOKIE`
    /// - `AML_CONSOLE_TIMEOUT_SECS`
    /// - `AML_CONSOLE_LIVE_REFRESH_SECS`, `AML_CONSOLE_LIMITS_REFRESH_SECS`
    /// - `AML_CONSOLE_ANALYTICS_DAYS`, `AML_CONSOLE_UPCOMING_DAYS`
    /// - `AML_CONSOLE_FEED_LIMIT`
    ///
    /// Unparseable numbers are ignored in favour of the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }

        let mut config = Self::new(
            lookup("AML_CONSOLE_ENDPOINT").unwrap_or_else(default_endpoint),
        );
        config.xsrf_token = lookup("AML_CONSOLE_XSRF_TOKEN");
        config.session_cookie = lookup("AML_CONSOLE_SESSION_COOKIE");
        config.timeout_secs = parsed(&lookup, "AML_CONSOLE_TIMEOUT_SECS");
        if let Some(v) = parsed(&lookup, "AML_CONSOLE_LIVE_REFRESH_SECS") {
            config.live_refresh_secs = v;
        }
        if let Some(v) = parsed(&lookup, "AML_CONSOLE_LIMITS_REFRESH_SECS") {
            config.limits_refresh_secs = v;
        }
        if let Some(v) = parsed(&lookup, "AML_CONSOLE_ANALYTICS_DAYS") {
            config.analytics_period_days = v;
        }
        if let Some(v) = parsed(&lookup, "AML_CONSOLE_UPCOMING_DAYS") {
            config.upcoming_days = v;
        }
        if let Some(v) = parsed(&lookup, "AML_CONSOLE_FEED_LIMIT") {
            config.feed_limit = v;
        }
        config
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConsoleError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConsoleError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConsoleError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::Configuration(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Reject settings that would make the console unusable.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConsoleError::Configuration("endpoint is empty".into()));
        }
        if self.live_refresh_secs == 0 || self.limits_refresh_secs == 0 {
            return Err(ConsoleError::Configuration(
                "refresh intervals must be at least one second".into(),
            ));
        }
        if self.feed_limit == 0 {
            return Err(ConsoleError::Configuration("feed_limit must be positive".into()));
        }
        if !(1..=MAX_PERIOD_DAYS).contains(&self.analytics_period_days) {
            return Err(ConsoleError::Configuration(format!(
                "analytics_period_days must be between 1 and {MAX_PERIOD_DAYS}"
            )));
        }
        Ok(())
    }

    /// Override the XSRF token.
    #[must_use]
    pub fn with_xsrf_token(mut self, token: impl Into<String>) -> Self {
        self.xsrf_token = Some(token.into());
        self
    }

    /// Override the session cookie.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    #[must_use]
    pub fn with_analytics_period_days(mut self, days: u32) -> Self {
        self.analytics_period_days = days;
        self
    }

    #[must_use]
    pub fn with_feed_limit(mut self, limit: u32) -> Self {
        self.feed_limit = limit;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn live_refresh(&self) -> Duration {
        Duration::from_secs(self.live_refresh_secs)
    }

    pub fn limits_refresh(&self) -> Duration {
        Duration::from_secs(self.limits_refresh_secs)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
