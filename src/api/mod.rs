pub mod client;
pub mod models;

mod tracks;

use crate::error::AppResult;
use async_trait::async_trait;
use models::ResolvedTrack;

/// Turns a remote page URL into track metadata and a playable stream URL.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> AppResult<ResolvedTrack>;

    /// Streaming URL for a resolved track, credential included.
    fn stream_url(&self, track: &ResolvedTrack) -> String;
}
