use crate::api::MetadataResolver;
use crate::audio::player::PlayerFactory;
use crate::audio::queue::Playlist;
use crate::audio::track::TrackId;
use crate::commands::Direction;
use crate::config::{AppConfig, SeedTrack};
use crate::events::{ControlEvent, RenderFrame, TransportView};
use crate::render::Renderer;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// The playlist controller.
///
/// State machine over the active track and the playing flag:
/// empty (no active track), loaded-paused, loaded-playing. Every mutation
/// ends with a render.
pub struct Jukebox {
    pub(crate) playlist: Playlist,
    pub(crate) is_playing: bool,
    pub(crate) volume: u8,
    pub(crate) remote_marker: String,
    pub(crate) resolver: Arc<dyn MetadataResolver>,
    pub(crate) players: Arc<dyn PlayerFactory>,
    pub(crate) events: UnboundedSender<ControlEvent>,
    renderer: Box<dyn Renderer>,
}

impl Jukebox {
    pub fn new(
        config: &AppConfig,
        resolver: Arc<dyn MetadataResolver>,
        players: Arc<dyn PlayerFactory>,
        renderer: Box<dyn Renderer>,
        events: UnboundedSender<ControlEvent>,
    ) -> Self {
        Self {
            playlist: Playlist::new(),
            is_playing: false,
            volume: config.volume.min(100),
            remote_marker: config.remote_marker.clone(),
            resolver,
            players,
            events,
            renderer,
        }
    }

    /// Queue the startup tracks, select the first one and draw.
    pub fn start(&mut self, seed: &[SeedTrack]) {
        for entry in seed {
            if let Err(e) = self.add_track(&entry.locator, entry.metadata.clone()) {
                log::warn!("[start] Skipping {}: {}", entry.locator, e);
            }
        }
        if let Some(first) = self.playlist.id_at(0) {
            if let Err(e) = self.change(first) {
                log::warn!("[start] Could not select {}: {}", first, e);
            }
        }
        self.render();
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn active_track(&self) -> Option<TrackId> {
        self.playlist.active_id()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub(crate) fn gain(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    pub fn frame(&self) -> RenderFrame {
        let active = self.playlist.active();
        RenderFrame {
            tracks: self.playlist.views(),
            transport: TransportView {
                is_playing: self.is_playing,
                has_active_track: active.is_some(),
                active_ready: active.is_some_and(|t| t.is_ready()),
                volume: self.volume,
            },
        }
    }

    pub fn render(&mut self) {
        let frame = self.frame();
        self.renderer.render(&frame);
    }

    /// Apply one event. Returns `false` when the loop should end.
    pub fn handle(&mut self, event: ControlEvent) -> bool {
        log::debug!("[handle] {:?}", event);
        let result = match event.clone() {
            ControlEvent::TogglePlay => self.toggle_play().map(|_| ()),
            ControlEvent::Stop => self.stop().map(|_| ()),
            ControlEvent::Next => self.skip(Direction::Forward).map(|_| ()),
            ControlEvent::Previous => self.skip(Direction::Backward).map(|_| ()),
            ControlEvent::Mute => {
                self.set_volume(0);
                Ok(())
            }
            ControlEvent::SetVolume(level) => {
                self.set_volume(level);
                Ok(())
            }
            ControlEvent::Shuffle => {
                self.shuffle();
                Ok(())
            }
            ControlEvent::Select(index) => self.select(index).map(|_| ()),
            ControlEvent::FilesSelected(paths) => {
                self.add_files(&paths);
                Ok(())
            }
            ControlEvent::AddUrl(url) => self.add_track(&url, None).map(|_| ()),
            ControlEvent::TrackUpdated(id) => {
                self.track_updated(id);
                Ok(())
            }
            ControlEvent::Quit => return false,
        };

        if let Err(e) = result {
            log::info!("[handle] {:?} had no effect: {}", event, e);
        }
        true
    }

    /// Consume events until `Quit`. This is the only subscriber of the
    /// event channel.
    pub async fn run_loop(&mut self, mut rx: UnboundedReceiver<ControlEvent>) {
        while let Some(event) = rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        log::info!("Jukebox stopped");
    }
}
