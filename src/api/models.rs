use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SoundCloudUser {
    pub username: String,
}

/// Track resource as returned by the `/resolve` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundCloudTrack {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub kind: Option<String>,
    pub title: String,
    pub user: SoundCloudUser,
    pub uri: String,
    #[serde(default)]
    pub streamable: Option<bool>,
}

/// Result of a successful resolution: display metadata plus the identifier
/// the stream URL is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub title: String,
    pub artist: String,
    pub stream_id: String,
}

impl From<SoundCloudTrack> for ResolvedTrack {
    fn from(track: SoundCloudTrack) -> Self {
        Self {
            title: track.title,
            artist: track.user.username,
            stream_id: track.uri,
        }
    }
}
