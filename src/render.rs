use crate::config::RenderFormat;
use crate::events::RenderFrame;
use std::io::Write;
use tokio::sync::mpsc::UnboundedSender;

/// Draws the jukebox. Called after every state change, so implementations
/// must tolerate redundant frames.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

/// Writes each frame to a terminal-style sink.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    format: RenderFormat,
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout(format: RenderFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, format: RenderFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        writeln!(self.out)?;
        for (index, track) in frame.tracks.iter().enumerate() {
            let marker = if track.is_active { '>' } else { ' ' };
            let suffix = match (&track.error, track.is_ready) {
                (Some(error), _) => format!(" [unavailable: {}]", error),
                (None, false) => " [loading]".to_string(),
                (None, true) => String::new(),
            };
            writeln!(
                self.out,
                "{} {:>2}. {} - {}{}",
                marker,
                index + 1,
                track.title,
                track.artist,
                suffix
            )?;
        }

        let transport = &frame.transport;
        let state = if transport.is_playing { "playing" } else { "paused" };
        let stop = if transport.is_playing { "enabled" } else { "disabled" };
        let controls = if transport.has_active_track && !transport.active_ready {
            " controls:disabled"
        } else {
            ""
        };
        writeln!(
            self.out,
            "[{}] stop:{} volume:{}{}",
            state, stop, transport.volume, controls
        )?;
        self.out.flush()
    }

    fn write_json(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, frame: &RenderFrame) {
        let result = match self.format {
            RenderFormat::Text => self.write_text(frame),
            RenderFormat::Json => self.write_json(frame),
        };
        if let Err(e) = result {
            log::warn!("Failed to render frame: {}", e);
        }
    }
}

/// Forwards frames to whoever holds the receiving end.
pub struct ChannelRenderer {
    tx: UnboundedSender<RenderFrame>,
}

impl ChannelRenderer {
    pub fn new(tx: UnboundedSender<RenderFrame>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        if self.tx.send(frame.clone()).is_err() {
            log::debug!("Render channel closed, dropping frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::track::TrackId;
    use crate::events::{TrackView, TransportView};

    fn frame() -> RenderFrame {
        RenderFrame {
            tracks: vec![
                TrackView {
                    id: TrackId::new(),
                    title: "Bloom".into(),
                    artist: "Odesza".into(),
                    is_active: true,
                    is_ready: true,
                    error: None,
                },
                TrackView {
                    id: TrackId::new(),
                    title: "Unknown title".into(),
                    artist: "Unknown artist".into(),
                    is_active: false,
                    is_ready: false,
                    error: None,
                },
                TrackView {
                    id: TrackId::new(),
                    title: "Unknown title".into(),
                    artist: "Unknown artist".into(),
                    is_active: false,
                    is_ready: false,
                    error: Some("Not found".into()),
                },
            ],
            transport: TransportView {
                is_playing: false,
                has_active_track: true,
                active_ready: true,
                volume: 80,
            },
        }
    }

    #[test]
    fn text_marks_active_and_pending_tracks() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), RenderFormat::Text);
        renderer.render(&frame());
        let out = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(out.contains(">  1. Bloom - Odesza"));
        assert!(out.contains("   2. Unknown title - Unknown artist [loading]"));
        assert!(out.contains("[unavailable: Not found]"));
        assert!(out.contains("[paused] stop:disabled volume:80"));
        assert!(!out.contains("controls:disabled"));
    }

    #[test]
    fn json_writes_one_frame_per_line() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), RenderFormat::Json);
        renderer.render(&frame());
        renderer.render(&frame());
        let out = String::from_utf8(renderer.into_inner()).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["tracks"][0]["isActive"], true);
        assert_eq!(value["transport"]["hasActiveTrack"], true);
    }

    #[test]
    fn channel_renderer_forwards_frames() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut renderer = ChannelRenderer::new(tx);
        let sent = frame();
        renderer.render(&sent);
        assert_eq!(rx.try_recv().unwrap(), sent);
    }
}
