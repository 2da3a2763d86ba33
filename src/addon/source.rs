use crate::error::{InstallError, Result};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where release index pages and archives come from.
pub trait ReleaseSource: Send + Sync + 'static {
    /// Fetches a document body as text.
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    /// Fetches a raw response body.
    fn get_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Plain HTTP(S) GET source backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wowpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstallError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpSource { client })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response)
    }
}

impl ReleaseSource for HttpSource {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        response.text().await.map_err(|e| fetch_error(url, e))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|e| fetch_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

fn fetch_error(url: &str, err: reqwest::Error) -> InstallError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    InstallError::Fetch {
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source keyed by URL; records every request.
    #[derive(Debug, Default)]
    pub struct StaticSource {
        pages: HashMap<String, String>,
        archives: HashMap<String, Vec<u8>>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticSource {
        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn archive(mut self, url: &str, bytes: Vec<u8>) -> Self {
            self.archives.insert(url.to_string(), bytes);
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }

        fn record(&self, url: &str) {
            self.requested.lock().unwrap().push(url.to_string());
        }
    }

    fn not_found(url: &str) -> InstallError {
        InstallError::Fetch {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        }
    }

    impl ReleaseSource for StaticSource {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.record(url);
            self.pages.get(url).cloned().ok_or_else(|| not_found(url))
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.record(url);
            self.archives.get(url).cloned().ok_or_else(|| not_found(url))
        }
    }
}
