use serde::{Deserialize, Serialize};

use crate::models::MediaKind;

/// Envelope for everything published on the rotation event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: EventSource,
}

impl RotationEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: chrono::Utc::now(),
            source: EventSource::System,
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }
}

/// Event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    // Display events
    SlotActivated,
    PlaylistReplaced,

    // Playback events
    PlaybackStarted,
}

/// Event payload containing specific data for each event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Slot {
        index: usize,
        media_url: String,
        kind: MediaKind,
    },
    Playlist {
        item_count: usize,
    },
    Playback {
        index: usize,
        media_url: String,
    },
}

/// Event source indicating where the event originated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventSource {
    System,
    Carousel,
    Scheduler,
}

impl EventType {
    /// Get a string representation for filtering/routing
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SlotActivated => "slot.activated",
            EventType::PlaylistReplaced => "playlist.replaced",
            EventType::PlaybackStarted => "playback.started",
        }
    }
}
