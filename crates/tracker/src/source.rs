//! [`ProfileFetcher`] over the HTTP profile source.

use async_trait::async_trait;
use skilltrack_core::normalizer;
use skilltrack_core::profile::Profile;
use skilltrack_source::ProfileClient;

use crate::error::FetchError;
use crate::store::ProfileFetcher;

#[async_trait]
impl ProfileFetcher for ProfileClient {
    async fn fetch_profile(&self, handle: &str) -> Result<Profile, FetchError> {
        let raw = ProfileClient::fetch_profile(self, handle).await?;
        Ok(normalizer::normalize(raw)?)
    }
}
