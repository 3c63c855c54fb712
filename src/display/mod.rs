pub mod carousel;

pub use carousel::Carousel;

use std::fmt;
use std::sync::Arc;

use crate::models::PlaylistEntry;
use crate::player::MediaPlayer;

/// One installed display slot: the playlist entry plus the presentation
/// resource built for it.
#[derive(Debug, Clone)]
pub struct Slot {
    pub entry: PlaylistEntry,
    pub media: SlotMedia,
}

#[derive(Clone)]
pub enum SlotMedia {
    /// Pre-loaded player; playback starts only when the slot is activated.
    Video(Arc<dyn MediaPlayer>),
    /// Optimized static image reference.
    Image { optimized_url: String },
}

impl Slot {
    pub fn player(&self) -> Option<&Arc<dyn MediaPlayer>> {
        match &self.media {
            SlotMedia::Video(player) => Some(player),
            SlotMedia::Image { .. } => None,
        }
    }
}

impl fmt::Debug for SlotMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotMedia::Video(_) => f.write_str("SlotMedia::Video"),
            SlotMedia::Image { optimized_url } => f
                .debug_struct("SlotMedia::Image")
                .field("optimized_url", optimized_url)
                .finish(),
        }
    }
}

/// Derive the CDN-optimized variant of an image URL, mirroring the host
/// pipeline's picture helper (format and width query parameters).
pub fn optimized_image_url(url: &str, width: u32) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed
                .query_pairs_mut()
                .append_pair("width", &width.to_string())
                .append_pair("format", "webply")
                .append_pair("optimize", "medium");
            parsed.to_string()
        }
        // Relative or malformed references are displayed as-is
        Err(_) => url.to_string(),
    }
}
