use anyhow::Result;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::display::{Carousel, Slot, SlotMedia, optimized_image_url};
use crate::models::{MediaKind, PlaylistEntry, PlaylistResponse};
use crate::player::PlayerFactory;
use crate::services::core::rotation::RotationScheduler;

/// Render width requested for optimized image slots.
const IMAGE_RENDER_WIDTH: u32 = 1920;

#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("Payload has no data array")]
    MissingData,
}

/// Transforms accepted playlist payloads into rotation-ready slots.
pub struct PlaylistService;

impl PlaylistService {
    /// Decode the wire payload into ordered entries, keeping the raw value
    /// for change detection. Entries with unusable media URLs are skipped;
    /// unusable durations are clamped rather than rejected.
    pub fn parse_response(raw: Value) -> Result<PlaylistResponse, PlaylistError> {
        let data = raw
            .get("data")
            .and_then(Value::as_array)
            .ok_or(PlaylistError::MissingData)?;

        let mut entries = Vec::with_capacity(data.len());
        for (index, item) in data.iter().enumerate() {
            let url = item
                .get("Published Link")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or("");
            if url.is_empty() {
                warn!("Skipping playlist entry {} with no usable media URL", index);
                continue;
            }

            let dwell = PlaylistEntry::clamp_dwell(item.get("Duration").and_then(Value::as_f64));
            entries.push(PlaylistEntry::new(url, dwell));
        }

        Ok(PlaylistResponse { entries, raw })
    }

    /// Rebuild the rotating display from an accepted response: one slot per
    /// entry in original order, scheduler re-seeded, carousel contents
    /// swapped wholesale. Slot 0 is shown last so its activation arms the
    /// freshly seeded scheduler.
    pub async fn render(
        carousel: &Carousel,
        scheduler: &RotationScheduler,
        factory: &dyn PlayerFactory,
        response: &PlaylistResponse,
    ) -> Result<()> {
        let mut slots = Vec::with_capacity(response.entries.len());
        for entry in &response.entries {
            let media = match entry.kind {
                MediaKind::Video => {
                    let player = factory.create();
                    player.load_media(&entry.media_url).await?;
                    SlotMedia::Video(player)
                }
                MediaKind::Image => SlotMedia::Image {
                    optimized_url: optimized_image_url(&entry.media_url, IMAGE_RENDER_WIDTH),
                },
            };
            slots.push(Slot {
                entry: entry.clone(),
                media,
            });
        }

        info!("Rendering playlist with {} slots", slots.len());
        scheduler.install(response.entries.clone()).await;
        carousel.install(slots).await;

        Ok(())
    }
}
