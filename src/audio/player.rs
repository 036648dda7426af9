use crate::error::{AppError, AppResult};
use std::time::{Duration, Instant};

/// Playback engine behind a single track.
///
/// Implementations own the decode/output side; the jukebox only ever asks
/// for these transport operations.
pub trait Player: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// Pause and rewind to the start.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    fn position_seconds(&self) -> f64;

    /// Gain in [0.0, 1.0].
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;
}

/// Builds players from a local path, blob reference, or stream URL.
pub trait PlayerFactory: Send + Sync {
    fn open(&self, locator: &str) -> AppResult<Box<dyn Player>>;
}

/// Clock-driven player with no audio output. The cursor advances in real
/// time while playing.
#[derive(Debug)]
pub struct VirtualPlayer {
    locator: String,
    volume: f32,
    /// Position accumulated before the current play span.
    elapsed: Duration,
    /// Start of the current play span, if playing.
    started_at: Option<Instant>,
}

impl VirtualPlayer {
    pub fn new(locator: &str) -> Self {
        Self {
            locator: locator.to_string(),
            volume: 1.0,
            elapsed: Duration::ZERO,
            started_at: None,
        }
    }
}

impl Player for VirtualPlayer {
    fn play(&mut self) {
        if self.started_at.is_none() {
            log::debug!("[player] play {}", self.locator);
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.elapsed += started.elapsed();
        }
    }

    fn stop(&mut self) {
        self.started_at = None;
        self.elapsed = Duration::ZERO;
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn position_seconds(&self) -> f64 {
        let running = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.elapsed + running).as_secs_f64()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VirtualPlayerFactory;

impl PlayerFactory for VirtualPlayerFactory {
    fn open(&self, locator: &str) -> AppResult<Box<dyn Player>> {
        if locator.trim().is_empty() {
            return Err(AppError::Player("Empty locator".into()));
        }
        Ok(Box::new(VirtualPlayer::new(locator)))
    }
}
