pub mod playback_commands;
pub mod queue_commands;

pub use playback_commands::Direction;
pub use queue_commands::TrackSource;
