//! REST client for the profile source's `/profile/profile` endpoint.

use skilltrack_core::normalizer::RawProfile;

/// Number of recent activities requested when none is configured.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 20;

/// HTTP client for the profile source.
#[derive(Clone)]
pub struct ProfileClient {
    client: reqwest::Client,
    base_url: String,
    activity_limit: u32,
}

/// Errors from the profile source transport layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The source returned a non-2xx status code.
    #[error("Profile source error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ProfileClient {
    /// Create a client for the source at `base_url`,
    /// e.g. `https://apps.runescape.com/runemetrics`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`], which
    /// carries connection pooling and any transport timeout.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
        }
    }

    /// Set how many recent activities to request per profile.
    pub fn with_activity_limit(mut self, limit: u32) -> Self {
        self.activity_limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw profile for an already-normalized handle.
    ///
    /// Sends `GET {base}/profile/profile?user={handle}&activities={n}`.
    /// A 2xx body carrying an `error` field is still returned as `Ok`;
    /// the normalizer decides what it means.
    pub async fn fetch_profile(&self, handle: &str) -> Result<RawProfile, SourceError> {
        let activities = self.activity_limit.to_string();
        tracing::debug!(player = %handle, base_url = %self.base_url, "Fetching profile");

        let response = self
            .client
            .get(format!("{}/profile/profile", self.base_url))
            .query(&[("user", handle), ("activities", activities.as_str())])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, capturing the body
    /// of a failure for diagnostics.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SourceError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SourceError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ProfileClient::new("http://localhost:9000/runemetrics/");
        assert_eq!(client.base_url(), "http://localhost:9000/runemetrics");
    }
}
