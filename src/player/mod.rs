// Display-agnostic playback abstractions. Concrete video backends
// (GStreamer, mpv) slot in behind MediaPlayer when a video output exists;
// the shipped implementation is the headless player.

use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

pub mod headless;

pub use headless::{HeadlessPlayer, HeadlessPlayerFactory};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
    Stopped,
    Error(String),
}

/// Media playback primitive for one display slot.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    async fn load_media(&self, url: &str) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
    async fn set_muted(&self, muted: bool) -> Result<()>;
    async fn is_muted(&self) -> bool;
    async fn state(&self) -> PlayerState;

    /// Downcast support for backend-specific access
    fn as_any(&self) -> &dyn Any;
}

/// Creates one player per video slot when a playlist is rendered.
pub trait PlayerFactory: Send + Sync {
    fn create(&self) -> Arc<dyn MediaPlayer>;
}
