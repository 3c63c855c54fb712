pub mod core;

pub use core::{PlaybackService, PlaylistService, PollerService, RotationScheduler};
