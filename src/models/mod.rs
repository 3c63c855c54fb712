use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::constants::MIN_DWELL;

/// How a slot's media is presented once it becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Classify a media URL by suffix; `.mp4` is the only container the
    /// display pipeline plays as video, everything else is a still image.
    pub fn from_url(url: &str) -> Self {
        if url.trim_end().to_ascii_lowercase().ends_with(".mp4") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// One rotating display item. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub media_url: String,
    pub dwell: Duration,
    pub kind: MediaKind,
}

impl PlaylistEntry {
    pub fn new(media_url: impl Into<String>, dwell: Duration) -> Self {
        let media_url = media_url.into();
        let kind = MediaKind::from_url(&media_url);
        Self {
            media_url,
            dwell: dwell.max(MIN_DWELL),
            kind,
        }
    }

    /// Dwell from the wire-level whole-seconds value. Zero, negative,
    /// missing, and unrepresentable durations all clamp to the floor.
    pub fn clamp_dwell(seconds: Option<f64>) -> Duration {
        seconds
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
            .map_or(MIN_DWELL, |d| d.max(MIN_DWELL))
    }
}

/// An accepted playlist poll: the decoded entries plus the raw payload the
/// poller compares for structural change detection.
#[derive(Debug, Clone)]
pub struct PlaylistResponse {
    pub entries: Vec<PlaylistEntry>,
    pub raw: Value,
}

impl PartialEq for PlaylistResponse {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// Live display state driven by the rotation scheduler.
///
/// Invariants: `active_index` is valid for the current `items` whenever
/// `items` is non-empty, and at most one pending advance exists at a time.
#[derive(Debug, Default)]
pub struct RotationState {
    pub items: Vec<PlaylistEntry>,
    pub active_index: usize,
    pub pending: Option<JoinHandle<()>>,
}

impl RotationState {
    /// Wholesale item replacement; aborts any outstanding advance and
    /// resets the active index.
    pub fn replace_items(&mut self, items: Vec<PlaylistEntry>) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.items = items;
        self.active_index = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
