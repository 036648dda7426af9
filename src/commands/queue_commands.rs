use crate::audio::track::{LocalTrack, RemoteTrack, Track, TrackId, TrackMetadata};
use crate::error::{AppError, AppResult};
use crate::events::{UPLOADED_ARTIST, UPLOADED_TITLE};
use crate::jukebox::Jukebox;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    Local,
    Remote,
}

impl TrackSource {
    /// Plain substring match against the streaming service's domain; no URL
    /// parsing is attempted.
    pub fn classify(locator: &str, remote_marker: &str) -> Self {
        if !remote_marker.is_empty() && locator.contains(remote_marker) {
            TrackSource::Remote
        } else {
            TrackSource::Local
        }
    }
}

impl Jukebox {
    /// Append a track built from `locator`. Remote tracks are appended
    /// unresolved and announce themselves through `TrackUpdated` events;
    /// `metadata` only applies to local tracks.
    pub fn add_track(
        &mut self,
        locator: &str,
        metadata: Option<TrackMetadata>,
    ) -> AppResult<TrackId> {
        let mut track: Box<dyn Track> = match TrackSource::classify(locator, &self.remote_marker) {
            TrackSource::Remote => Box::new(RemoteTrack::spawn(
                locator,
                Arc::clone(&self.resolver),
                Arc::clone(&self.players),
                self.events.clone(),
            )),
            TrackSource::Local => Box::new(LocalTrack::new(locator, metadata, self.players.as_ref())?),
        };
        track.set_volume(self.gain());

        let id = self.playlist.push(track);
        log::info!("[add_track] {} as {}", locator, id);
        self.render();
        Ok(id)
    }

    /// Add user-selected files with placeholder metadata. A file that fails
    /// to open is skipped.
    pub fn add_files(&mut self, paths: &[String]) -> Vec<TrackId> {
        paths
            .iter()
            .filter_map(|path| {
                let meta = TrackMetadata::new(UPLOADED_TITLE, UPLOADED_ARTIST);
                match self.add_track(path, Some(meta)) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("[add_files] {}: {}", path, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Play the track at `index` in playlist order.
    pub fn select(&mut self, index: usize) -> AppResult<TrackId> {
        let id = self
            .playlist
            .id_at(index)
            .ok_or_else(|| AppError::NotFound(format!("No track at position {}", index + 1)))?;
        self.play(Some(id))
    }

    pub fn shuffle(&mut self) {
        self.playlist.shuffle();
        self.render();
    }

    /// A remote track finished a resolution step.
    pub fn track_updated(&mut self, id: TrackId) {
        if self.playlist.contains(id) {
            self.render();
        } else {
            log::debug!("[track_updated] {} is no longer in the playlist", id);
        }
    }
}
