use anyhow::Result;
use tracing::debug;

use crate::events::EventBus;
use crate::player::MediaPlayer;

/// Bridges slot activations to the media playback primitive.
pub struct PlaybackService;

impl PlaybackService {
    /// Mute-then-play for a video slot that just became visible. Image
    /// slots never reach this call.
    pub async fn start_muted(
        bus: &EventBus,
        player: &dyn MediaPlayer,
        index: usize,
        media_url: &str,
    ) -> Result<()> {
        player.set_muted(true).await?;
        player.play().await?;
        debug!("Muted playback started for slot {}: {}", index, media_url);

        bus.emit_playback_started(index, media_url.to_string()).await
    }
}
