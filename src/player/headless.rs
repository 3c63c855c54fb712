use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::{MediaPlayer, PlayerFactory, PlayerState};

/// Player for deployments without a video output. Tracks the same state
/// transitions a real backend would report, so the rotation pipeline and
/// the tests observe identical behavior.
pub struct HeadlessPlayer {
    state: RwLock<PlayerState>,
    muted: RwLock<bool>,
    media_url: RwLock<Option<String>>,
    play_calls: AtomicUsize,
}

impl HeadlessPlayer {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(PlayerState::Idle),
            muted: RwLock::new(false),
            media_url: RwLock::new(None),
            play_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times playback was started on this player.
    pub fn play_count(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub async fn media_url(&self) -> Option<String> {
        self.media_url.read().await.clone()
    }
}

impl Default for HeadlessPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaPlayer for HeadlessPlayer {
    async fn load_media(&self, url: &str) -> Result<()> {
        *self.state.write().await = PlayerState::Loading;
        *self.media_url.write().await = Some(url.to_string());
        // Loaded but not playing until the slot is activated
        *self.state.write().await = PlayerState::Paused;
        debug!("Loaded media: {}", url);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        if self.media_url.read().await.is_none() {
            return Err(anyhow!("No media loaded"));
        }
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.write().await = PlayerState::Playing;
        let muted = *self.muted.read().await;
        debug!("Playback started (muted: {})", muted);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        *self.state.write().await = PlayerState::Paused;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.state.write().await = PlayerState::Stopped;
        Ok(())
    }

    async fn set_muted(&self, muted: bool) -> Result<()> {
        *self.muted.write().await = muted;
        Ok(())
    }

    async fn is_muted(&self) -> bool {
        *self.muted.read().await
    }

    async fn state(&self) -> PlayerState {
        self.state.read().await.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory handing out headless players, one per video slot.
pub struct HeadlessPlayerFactory;

impl PlayerFactory for HeadlessPlayerFactory {
    fn create(&self) -> Arc<dyn MediaPlayer> {
        Arc::new(HeadlessPlayer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_leaves_player_paused() {
        let player = HeadlessPlayer::new();
        player.load_media("http://cdn/spot.mp4").await.unwrap();

        assert_eq!(player.state().await, PlayerState::Paused);
        assert_eq!(player.media_url().await.as_deref(), Some("http://cdn/spot.mp4"));
        assert_eq!(player.play_count(), 0);
    }

    #[tokio::test]
    async fn test_play_requires_loaded_media() {
        let player = HeadlessPlayer::new();
        assert!(player.play().await.is_err());

        player.load_media("http://cdn/spot.mp4").await.unwrap();
        player.play().await.unwrap();
        assert_eq!(player.state().await, PlayerState::Playing);
        assert_eq!(player.play_count(), 1);
    }

    #[tokio::test]
    async fn test_mute_flag() {
        let player = HeadlessPlayer::new();
        assert!(!player.is_muted().await);
        player.set_muted(true).await.unwrap();
        assert!(player.is_muted().await);
    }
}
