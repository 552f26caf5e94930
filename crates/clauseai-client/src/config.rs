use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const ANALYZE_PATH: &str = "/api/analyze";
pub const HEALTH_PATH: &str = "/health";

/// Where the analysis service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
