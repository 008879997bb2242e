//! Configuration options for the catalog client

use std::env;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "CATALOG_API_URL";

/// Legacy variable name the web frontend reads
pub const LEGACY_BASE_URL_ENV: &str = "VITE_API_URL";

/// Environment variable holding a request timeout in seconds
pub const TIMEOUT_ENV: &str = "CATALOG_API_TIMEOUT_SECS";

/// Configuration options for the catalog client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The base URL every endpoint path is appended to
    pub base_url: String,

    /// The request timeout, `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// Page size used by `fetch_all`
    pub fetch_all_batch_size: usize,

    /// Upper bound on full pages `fetch_all` will follow, `None` for no bound
    pub fetch_all_max_pages: Option<usize>,

    /// The User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            fetch_all_batch_size: 500,
            fetch_all_max_pages: Some(10_000),
            user_agent: format!("catalog-admin-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Build options from the process environment.
    ///
    /// `CATALOG_API_URL` wins over `VITE_API_URL`; blank values are ignored.
    /// An unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        let base_url = [BASE_URL_ENV, LEGACY_BASE_URL_ENV]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(url) = base_url {
            options = options.with_base_url(&url);
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => options.request_timeout = Some(Duration::from_secs(secs)),
                Err(_) => log::warn!("ignoring {}={:?}: not a number of seconds", TIMEOUT_ENV, raw),
            }
        }

        options
    }

    /// Set the base URL; a trailing slash is dropped
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the page size used by `fetch_all`
    pub fn with_fetch_all_batch_size(mut self, value: usize) -> Self {
        self.fetch_all_batch_size = value;
        self
    }

    /// Set the page bound used by `fetch_all`
    pub fn with_fetch_all_max_pages(mut self, value: Option<usize>) -> Self {
        self.fetch_all_max_pages = value;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }
}
