use crate::api::models::ResolvedTrack;
use crate::api::MetadataResolver;
use crate::audio::player::{Player, PlayerFactory};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

/// Resolver returning a canned result, optionally held back until the
/// gate is opened.
pub(crate) struct StubResolver {
    result: Result<ResolvedTrack, String>,
    gate: Option<Arc<Notify>>,
}

impl StubResolver {
    pub(crate) fn ok(title: &str, artist: &str) -> Self {
        Self {
            result: Ok(ResolvedTrack {
                title: title.to_string(),
                artist: artist.to_string(),
                stream_id: format!("https://api.example.com/tracks/{}", title),
            }),
            gate: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            gate: None,
        }
    }

    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub(crate) fn gate(&self) -> Arc<Notify> {
        self.gate.clone().unwrap_or_else(|| Arc::new(Notify::new()))
    }
}

#[async_trait]
impl MetadataResolver for StubResolver {
    async fn resolve(&self, _url: &str) -> AppResult<ResolvedTrack> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone().map_err(AppError::Resolve)
    }

    fn stream_url(&self, track: &ResolvedTrack) -> String {
        format!("{}/stream?client_id=test", track.stream_id)
    }
}

pub(crate) struct FailingPlayerFactory;

impl PlayerFactory for FailingPlayerFactory {
    fn open(&self, locator: &str) -> AppResult<Box<dyn Player>> {
        Err(AppError::Player(format!("cannot open {}", locator)))
    }
}
