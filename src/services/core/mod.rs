/// Service modules for the rotation pipeline: poll, render, rotate, play.
pub mod playback;
pub mod playlist;
pub mod poller;
pub mod rotation;

pub use playback::PlaybackService;
pub use playlist::{PlaylistError, PlaylistService};
pub use poller::{PollError, PollerService};
pub use rotation::RotationScheduler;
