use crate::audio::track::TrackId;
use serde::Serialize;
use std::str::FromStr;

pub const UPLOADED_TITLE: &str = "Uploaded song";
pub const UPLOADED_ARTIST: &str = "Unknown";

/// Actions delivered to the jukebox event loop, either from the user or from
/// a remote track finishing a resolution step.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    TogglePlay,
    Stop,
    Next,
    Previous,
    Mute,
    Shuffle,
    SetVolume(i32),
    Select(usize),
    FilesSelected(Vec<String>),
    AddUrl(String),
    TrackUpdated(TrackId),
    Quit,
}

impl FromStr for ControlEvent {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "play" | "pause" | "p" => Ok(ControlEvent::TogglePlay),
            "stop" | "s" => Ok(ControlEvent::Stop),
            "next" | "n" => Ok(ControlEvent::Next),
            "prev" | "previous" => Ok(ControlEvent::Previous),
            "mute" | "m" => Ok(ControlEvent::Mute),
            "shuffle" => Ok(ControlEvent::Shuffle),
            "quit" | "q" | "exit" => Ok(ControlEvent::Quit),
            "volume" | "vol" => rest
                .parse()
                .map(ControlEvent::SetVolume)
                .map_err(|_| format!("Invalid volume: {:?}", rest)),
            "select" => rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(ControlEvent::Select)
                .ok_or_else(|| format!("Invalid track number: {:?}", rest)),
            "upload" if !rest.is_empty() => Ok(ControlEvent::FilesSelected(
                rest.split_whitespace().map(str::to_string).collect(),
            )),
            "add" if !rest.is_empty() => Ok(ControlEvent::AddUrl(rest.to_string())),
            "" => Err("Empty command".into()),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub is_active: bool,
    pub is_ready: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    pub is_playing: bool,
    pub has_active_track: bool,
    pub active_ready: bool,
    pub volume: u8,
}

/// Everything the rendering side needs to draw the jukebox.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub tracks: Vec<TrackView>,
    pub transport: TransportView,
}
