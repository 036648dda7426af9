use crate::api::MetadataResolver;
use crate::audio::player::{Player, PlayerFactory};
use crate::error::{AppError, AppResult};
use crate::events::ControlEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_ARTIST: &str = "Unknown artist";
const NO_RUNTIME: &str = "no async runtime";

/// Identity of one playlist entry. Two entries built from the same locator
/// still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
}

impl TrackMetadata {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self::new(UNKNOWN_TITLE, UNKNOWN_ARTIST)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackStatus {
    /// Waiting on remote resolution.
    Pending,
    Ready,
    /// Resolution failed; the track will never become playable.
    Failed(String),
}

/// One playable playlist entry.
///
/// `play` reports `AppError::Unresolved` when there is no player yet;
/// `pause` and `stop` are silent no-ops in that case.
pub trait Track {
    fn id(&self) -> TrackId;

    fn locator(&self) -> &str;

    fn metadata(&self) -> TrackMetadata;

    fn status(&self) -> TrackStatus;

    fn is_ready(&self) -> bool {
        self.status() == TrackStatus::Ready
    }

    fn play(&mut self) -> AppResult<()>;

    fn pause(&mut self);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    fn position_seconds(&self) -> f64;

    fn set_volume(&mut self, volume: f32);

    /// Gain the track plays at, in [0.0, 1.0].
    fn volume(&self) -> f32;

    /// Metadata to display; placeholder values until resolved.
    fn render_descriptor(&self) -> TrackMetadata {
        self.metadata()
    }
}

/// A file path or blob reference, playable as soon as it is constructed.
pub struct LocalTrack {
    id: TrackId,
    locator: String,
    metadata: TrackMetadata,
    player: Box<dyn Player>,
}

impl LocalTrack {
    pub fn new(
        locator: &str,
        metadata: Option<TrackMetadata>,
        players: &dyn PlayerFactory,
    ) -> AppResult<Self> {
        let player = players.open(locator)?;
        Ok(Self {
            id: TrackId::new(),
            locator: locator.to_string(),
            metadata: metadata.unwrap_or_default(),
            player,
        })
    }
}

impl Track for LocalTrack {
    fn id(&self) -> TrackId {
        self.id
    }

    fn locator(&self) -> &str {
        &self.locator
    }

    fn metadata(&self) -> TrackMetadata {
        self.metadata.clone()
    }

    fn status(&self) -> TrackStatus {
        TrackStatus::Ready
    }

    fn play(&mut self) -> AppResult<()> {
        self.player.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.player.pause();
    }

    fn stop(&mut self) {
        self.player.stop();
    }

    fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    fn position_seconds(&self) -> f64 {
        self.player.position_seconds()
    }

    fn set_volume(&mut self, volume: f32) {
        self.player.set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.player.volume()
    }
}

/// State shared between a remote track and its resolution task.
struct RemoteState {
    metadata: TrackMetadata,
    player: Option<Box<dyn Player>>,
    status: TrackStatus,
    /// Applied to the player once it exists.
    volume: f32,
}

fn lock(state: &Mutex<RemoteState>) -> MutexGuard<'_, RemoteState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A track addressed by a streaming-service URL. Metadata and the player
/// arrive asynchronously; dropping the track cancels whatever is left of
/// the resolution.
pub struct RemoteTrack {
    id: TrackId,
    url: String,
    state: Arc<Mutex<RemoteState>>,
    cancelled: Arc<AtomicBool>,
}

impl RemoteTrack {
    /// Create the track in the pending state and start resolving it on the
    /// current tokio runtime. `notify` receives `TrackUpdated` after the
    /// metadata lands and again when the track becomes playable or fails.
    ///
    /// Outside a runtime the track is created already failed.
    pub fn spawn(
        url: &str,
        resolver: Arc<dyn MetadataResolver>,
        players: Arc<dyn PlayerFactory>,
        notify: UnboundedSender<ControlEvent>,
    ) -> Self {
        let track = Self {
            id: TrackId::new(),
            url: url.to_string(),
            state: Arc::new(Mutex::new(RemoteState {
                metadata: TrackMetadata::default(),
                player: None,
                status: TrackStatus::Pending,
                volume: 1.0,
            })),
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let task = Resolution {
            id: track.id,
            url: track.url.clone(),
            state: Arc::clone(&track.state),
            cancelled: Arc::clone(&track.cancelled),
            notify,
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task.run(resolver, players));
            }
            Err(e) => {
                log::warn!("[resolve] {} not resolved: {}", track.url, e);
                lock(&track.state).status = TrackStatus::Failed(NO_RUNTIME.to_string());
            }
        }

        track
    }

    pub fn error(&self) -> Option<String> {
        match &lock(&self.state).status {
            TrackStatus::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }
}

impl Drop for RemoteTrack {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Track for RemoteTrack {
    fn id(&self) -> TrackId {
        self.id
    }

    fn locator(&self) -> &str {
        &self.url
    }

    fn metadata(&self) -> TrackMetadata {
        lock(&self.state).metadata.clone()
    }

    fn status(&self) -> TrackStatus {
        lock(&self.state).status.clone()
    }

    fn play(&mut self) -> AppResult<()> {
        let mut state = lock(&self.state);
        match state.player.as_mut() {
            Some(player) => {
                player.play();
                Ok(())
            }
            None => Err(AppError::Unresolved(self.url.clone())),
        }
    }

    fn pause(&mut self) {
        if let Some(player) = lock(&self.state).player.as_mut() {
            player.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(player) = lock(&self.state).player.as_mut() {
            player.stop();
        }
    }

    fn is_playing(&self) -> bool {
        lock(&self.state)
            .player
            .as_ref()
            .is_some_and(|player| player.is_playing())
    }

    fn position_seconds(&self) -> f64 {
        lock(&self.state)
            .player
            .as_ref()
            .map_or(0.0, |player| player.position_seconds())
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = lock(&self.state);
        state.volume = volume;
        if let Some(player) = state.player.as_mut() {
            player.set_volume(volume);
        }
    }

    fn volume(&self) -> f32 {
        let state = lock(&self.state);
        state
            .player
            .as_ref()
            .map_or(state.volume, |player| player.volume())
    }
}

/// The two-step resolution chain of a remote track.
struct Resolution {
    id: TrackId,
    url: String,
    state: Arc<Mutex<RemoteState>>,
    cancelled: Arc<AtomicBool>,
    notify: UnboundedSender<ControlEvent>,
}

impl Resolution {
    async fn run(self, resolver: Arc<dyn MetadataResolver>, players: Arc<dyn PlayerFactory>) {
        match self.resolve(resolver.as_ref(), players.as_ref()).await {
            Ok(()) => log::info!("[resolve] {} ready", self.url),
            Err(AppError::Cancelled) => {
                log::debug!("[resolve] {} dropped before resolution finished", self.url)
            }
            Err(e) => {
                log::warn!("[resolve] {} failed: {}", self.url, e);
                if self.check_cancelled().is_ok() {
                    lock(&self.state).status = TrackStatus::Failed(e.to_string());
                    self.updated();
                }
            }
        }
    }

    async fn resolve(
        &self,
        resolver: &dyn MetadataResolver,
        players: &dyn PlayerFactory,
    ) -> AppResult<()> {
        self.check_cancelled()?;
        let resolved = resolver.resolve(&self.url).await?;

        self.check_cancelled()?;
        lock(&self.state).metadata = TrackMetadata::new(&resolved.title, &resolved.artist);
        self.updated();

        let stream_url = resolver.stream_url(&resolved);
        self.check_cancelled()?;
        let mut player = players.open(&stream_url)?;

        let mut state = lock(&self.state);
        player.set_volume(state.volume);
        state.player = Some(player);
        state.status = TrackStatus::Ready;
        drop(state);
        self.updated();
        Ok(())
    }

    fn check_cancelled(&self) -> AppResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn updated(&self) {
        // The jukebox may already be gone.
        let _ = self.notify.send(ControlEvent::TrackUpdated(self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::player::VirtualPlayerFactory;
    use crate::audio::testing::{FailingPlayerFactory, StubResolver};
    use tokio::sync::mpsc;

    #[test]
    fn local_track_defaults_metadata() {
        let track = LocalTrack::new("blob:1", None, &VirtualPlayerFactory).unwrap();
        assert_eq!(track.metadata(), TrackMetadata::new(UNKNOWN_TITLE, UNKNOWN_ARTIST));
        assert!(track.is_ready());
        assert_eq!(track.locator(), "blob:1");
    }

    #[test]
    fn local_track_transport() {
        let meta = TrackMetadata::new("Bloom", "Odesza");
        let mut track =
            LocalTrack::new("./songs/Odesza-Bloom.mp3", Some(meta.clone()), &VirtualPlayerFactory)
                .unwrap();
        assert_eq!(track.render_descriptor(), meta);

        track.play().unwrap();
        assert!(track.is_playing());
        track.pause();
        assert!(!track.is_playing());
        track.play().unwrap();
        track.stop();
        assert!(!track.is_playing());
        assert_eq!(track.position_seconds(), 0.0);
    }

    #[test]
    fn local_track_surfaces_player_errors() {
        let result = LocalTrack::new("a.mp3", None, &FailingPlayerFactory);
        assert!(matches!(result, Err(AppError::Player(_))));
    }

    #[tokio::test]
    async fn remote_track_resolves_in_two_steps() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let resolver = Arc::new(StubResolver::ok("Kehna Hi Kya", "neelmonsta"));
        let mut track = RemoteTrack::spawn(
            "https://soundcloud.com/neelmonsta/kehna-hi-kya",
            resolver,
            Arc::new(VirtualPlayerFactory),
            tx,
        );

        assert_eq!(track.status(), TrackStatus::Pending);
        assert_eq!(track.metadata(), TrackMetadata::default());
        assert!(matches!(track.play(), Err(AppError::Unresolved(_))));
        track.pause();
        track.stop();
        track.set_volume(0.25);

        assert_eq!(rx.recv().await, Some(ControlEvent::TrackUpdated(track.id())));
        assert_eq!(rx.recv().await, Some(ControlEvent::TrackUpdated(track.id())));

        assert!(track.is_ready());
        assert_eq!(
            track.render_descriptor(),
            TrackMetadata::new("Kehna Hi Kya", "neelmonsta")
        );
        assert_eq!(track.volume(), 0.25);

        track.play().unwrap();
        assert!(track.is_playing());
        track.stop();
        assert!(!track.is_playing());
        assert_eq!(track.position_seconds(), 0.0);
    }

    #[tokio::test]
    async fn remote_track_resolve_failure_is_isolated() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut track = RemoteTrack::spawn(
            "https://soundcloud.com/gone",
            Arc::new(StubResolver::failing("network down")),
            Arc::new(VirtualPlayerFactory),
            tx,
        );

        assert_eq!(rx.recv().await, Some(ControlEvent::TrackUpdated(track.id())));
        assert!(matches!(track.status(), TrackStatus::Failed(_)));
        assert!(track.error().unwrap().contains("network down"));
        assert_eq!(track.metadata(), TrackMetadata::default());
        assert!(matches!(track.play(), Err(AppError::Unresolved(_))));
    }

    #[tokio::test]
    async fn remote_track_keeps_metadata_when_player_fails() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let track = RemoteTrack::spawn(
            "https://soundcloud.com/a/b",
            Arc::new(StubResolver::ok("Title", "Artist")),
            Arc::new(FailingPlayerFactory),
            tx,
        );

        rx.recv().await;
        rx.recv().await;
        assert_eq!(track.metadata(), TrackMetadata::new("Title", "Artist"));
        assert!(!track.is_ready());
        assert!(track.error().is_some());
    }

    #[test]
    fn remote_track_outside_a_runtime_fails_without_resolving() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut track = RemoteTrack::spawn(
            "https://soundcloud.com/a/b",
            Arc::new(StubResolver::ok("Title", "Artist")),
            Arc::new(VirtualPlayerFactory),
            tx,
        );

        assert_eq!(track.status(), TrackStatus::Failed(NO_RUNTIME.to_string()));
        assert_eq!(track.error().as_deref(), Some(NO_RUNTIME));
        assert!(matches!(track.play(), Err(AppError::Unresolved(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropping_a_pending_track_cancels_resolution() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let resolver = Arc::new(StubResolver::ok("Title", "Artist").gated());
        let gate = resolver.gate();
        let track = RemoteTrack::spawn(
            "https://soundcloud.com/a/b",
            resolver,
            Arc::new(VirtualPlayerFactory),
            tx,
        );
        let state = Arc::clone(&track.state);

        // Let the task reach the resolver before the track goes away.
        tokio::task::yield_now().await;
        drop(track);
        gate.notify_one();

        assert_eq!(rx.recv().await, None);
        let state = lock(&state);
        assert_eq!(state.status, TrackStatus::Pending);
        assert_eq!(state.metadata, TrackMetadata::default());
        assert!(state.player.is_none());
    }
}
