use crate::audio::track::TrackMetadata;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Text,
    Json,
}

/// One entry of the startup playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTrack {
    pub locator: String,
    #[serde(default)]
    pub metadata: Option<TrackMetadata>,
}

impl SeedTrack {
    fn local(locator: &str, title: &str, artist: &str) -> Self {
        Self {
            locator: locator.to_string(),
            metadata: Some(TrackMetadata::new(title, artist)),
        }
    }

    fn remote(locator: &str) -> Self {
        Self {
            locator: locator.to_string(),
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_remote_marker")]
    pub remote_marker: String,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default = "default_render_format")]
    pub render_format: RenderFormat,
    #[serde(default = "default_seed_tracks")]
    pub seed_tracks: Vec<SeedTrack>,
}

fn default_client_id() -> String {
    "fd4e76fc67798bfa742089ed619084a6".to_string()
}

fn default_api_base_url() -> String {
    "https://api.soundcloud.com".to_string()
}

fn default_remote_marker() -> String {
    "soundcloud.com".to_string()
}

fn default_volume() -> u8 {
    100
}

fn default_render_format() -> RenderFormat {
    RenderFormat::Text
}

fn default_seed_tracks() -> Vec<SeedTrack> {
    vec![
        SeedTrack::local("./songs/Odesza-Bloom.mp3", "Bloom", "Odesza"),
        SeedTrack::local(
            "./songs/Sleepwalking.mp3",
            "Sleepwalking",
            "The Chain Gang of 1974",
        ),
        SeedTrack::local(
            "./songs/PrettyLights-FinallyMoving.mp3",
            "Finally Moving",
            "Pretty Lights",
        ),
        SeedTrack::remote("https://soundcloud.com/neelmonsta/kehna-hi-kya-ountdown"),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            api_base_url: default_api_base_url(),
            remote_marker: default_remote_marker(),
            volume: default_volume(),
            render_format: default_render_format(),
            seed_tracks: default_seed_tracks(),
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> AppResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Cannot find home directory".into()))?;
        Ok(home.join(".jukebox"))
    }

    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
