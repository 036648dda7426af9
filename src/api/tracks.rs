use crate::api::client::SoundCloudClient;
use crate::api::models::{ResolvedTrack, SoundCloudTrack};
use crate::api::MetadataResolver;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;

impl SoundCloudClient {
    /// Resolve a public track page URL into its API resource.
    pub async fn resolve_track(&self, url: &str) -> AppResult<ResolvedTrack> {
        log::info!("Resolving {}", url);
        let response = self.get_with_query("/resolve", &[("url", url)]).await?;

        let body: serde_json::Value = response.json().await?;
        if let Some(kind) = body.get("kind").and_then(|v| v.as_str()) {
            if kind != "track" {
                return Err(AppError::Resolve(format!(
                    "{} resolved to a {}, not a track",
                    url, kind
                )));
            }
        }

        let track: SoundCloudTrack = serde_json::from_value(body)?;
        if track.streamable == Some(false) {
            return Err(AppError::Resolve(format!("{} is not streamable", url)));
        }

        log::info!(
            "Resolved {} -> {} by {} (id={:?})",
            url,
            track.title,
            track.user.username,
            track.id
        );
        Ok(track.into())
    }

    pub fn track_stream_url(&self, stream_id: &str) -> String {
        format!(
            "{}/stream?client_id={}",
            stream_id.trim_end_matches('/'),
            self.client_id()
        )
    }
}

#[async_trait]
impl MetadataResolver for SoundCloudClient {
    async fn resolve(&self, url: &str) -> AppResult<ResolvedTrack> {
        self.resolve_track(url).await
    }

    fn stream_url(&self, track: &ResolvedTrack) -> String {
        self.track_stream_url(&track.stream_id)
    }
}
