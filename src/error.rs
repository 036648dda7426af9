#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SoundCloud API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Resolve error: {0}")]
    Resolve(String),

    #[error("Player error: {0}")]
    Player(String),

    #[error("Playlist is empty")]
    EmptyPlaylist,

    #[error("No active track")]
    NoActiveTrack,

    #[error("Track not ready: {0}")]
    Unresolved(String),

    #[error("Resolution cancelled")]
    Cancelled,
}

pub type AppResult<T> = Result<T, AppError>;
