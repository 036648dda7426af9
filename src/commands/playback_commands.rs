use crate::audio::track::TrackId;
use crate::error::{AppError, AppResult};
use crate::jukebox::Jukebox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl Jukebox {
    fn require_active(&self) -> AppResult<TrackId> {
        if self.playlist.is_empty() {
            return Err(AppError::EmptyPlaylist);
        }
        self.playlist.active_id().ok_or(AppError::NoActiveTrack)
    }

    /// Start or resume playback, switching to `track` first when given.
    ///
    /// Selecting the track that is already active resumes it instead of
    /// rewinding it.
    pub fn play(&mut self, track: Option<TrackId>) -> AppResult<TrackId> {
        if let Some(id) = track {
            if self.playlist.active_id() != Some(id) {
                self.change(id)?;
            }
        }

        let id = self.require_active()?;
        let result = match self.playlist.get_mut(id) {
            Some(active) => active.play(),
            None => Err(AppError::NoActiveTrack),
        };

        match result {
            Ok(()) => {
                log::info!("[play] {}", id);
                self.is_playing = true;
                self.render();
                Ok(id)
            }
            Err(e) => {
                self.is_playing = false;
                self.render();
                Err(e)
            }
        }
    }

    pub fn pause(&mut self) -> AppResult<TrackId> {
        let id = self.require_active()?;
        if let Some(active) = self.playlist.get_mut(id) {
            active.pause();
        }
        self.is_playing = false;
        self.render();
        Ok(id)
    }

    /// Pause and rewind the active track.
    pub fn stop(&mut self) -> AppResult<TrackId> {
        let id = self.require_active()?;
        if let Some(active) = self.playlist.get_mut(id) {
            active.stop();
        }
        self.is_playing = false;
        self.render();
        Ok(id)
    }

    pub fn toggle_play(&mut self) -> AppResult<TrackId> {
        if self.is_playing {
            self.pause()
        } else {
            self.play(None)
        }
    }

    /// Make `track` the active one. The previous active track is always
    /// stopped first, which also clears the playing flag. Does not start
    /// playback.
    pub fn change(&mut self, track: TrackId) -> AppResult<TrackId> {
        if !self.playlist.contains(track) {
            return Err(AppError::NotFound(format!("Track {}", track)));
        }

        if let Some(previous) = self.playlist.active_mut() {
            previous.stop();
            self.is_playing = false;
        }

        log::info!("[change] {}", track);
        self.playlist.set_active(Some(track));
        self.render();
        Ok(track)
    }

    /// Move the selection one step, wrapping at both ends of the playlist.
    pub fn skip(&mut self, direction: Direction) -> AppResult<TrackId> {
        self.require_active()?;
        let target = self
            .playlist
            .neighbour(direction.offset())
            .ok_or(AppError::NoActiveTrack)?;
        self.change(target)
    }

    /// Store `level` clamped to [0, 100] and apply it to every track.
    pub fn set_volume(&mut self, level: i32) -> u8 {
        let clamped = level.clamp(0, 100) as u8;
        if i32::from(clamped) != level {
            log::warn!("[set_volume] {} out of range, using {}", level, clamped);
        }
        self.volume = clamped;

        let gain = self.gain();
        for track in self.playlist.iter_mut() {
            track.set_volume(gain);
        }
        self.render();
        clamped
    }
}
