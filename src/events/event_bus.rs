use super::types::{EventPayload, EventSource, EventType, RotationEvent};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::trace;

use crate::models::PlaylistEntry;

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<RotationEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    /// Create a new subscriber with an optional filter
    pub fn new(receiver: broadcast::Receiver<RotationEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter. A lagging subscriber
    /// skips to the oldest retained event instead of erroring out.
    pub async fn recv(&mut self) -> Result<RotationEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!("Subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(e @ broadcast::error::RecvError::Closed) => return Err(e.into()),
            };

            if let Some(ref filter) = self.filter {
                if filter.matches(&event) {
                    return Ok(event);
                }
            } else {
                return Ok(event);
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Result<Option<RotationEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(ref filter) = self.filter {
                        if filter.matches(&event) {
                            return Ok(Some(event));
                        }
                        // Continue to next event
                    } else {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Event filter for selective subscription
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
    sources: Option<Vec<EventSource>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self {
            event_types: None,
            sources: None,
        }
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    pub fn with_sources(mut self, sources: Vec<EventSource>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn matches(&self, event: &RotationEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }

        if let Some(ref sources) = self.sources
            && !sources.contains(&event.source)
        {
            return false;
        }

        true
    }
}

/// Main event bus for broadcasting rotation events
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<RotationEvent>,
    stats: Arc<RwLock<EventBusStats>>,
}

#[derive(Debug, Default)]
pub struct EventBusStats {
    pub total_events: u64,
    pub events_by_type: HashMap<String, u64>,
    pub subscriber_count: usize,
    pub dropped_events: u64,
}

impl EventBus {
    /// Create a new event bus with specified buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
        }
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: RotationEvent) -> Result<()> {
        trace!(
            "Publishing event: {:?} from {:?}",
            event.event_type, event.source
        );

        {
            let mut stats = self.stats.write().await;
            stats.total_events += 1;
            let event_type_str = event.event_type.as_str().to_string();
            *stats.events_by_type.entry(event_type_str).or_insert(0) += 1;
        }

        match self.sender.send(event) {
            Ok(_count) => Ok(()),
            Err(_) => {
                // No subscribers is normal, don't log
                let mut stats = self.stats.write().await;
                stats.dropped_events += 1;
                Ok(())
            }
        }
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    /// Subscribe with a filter
    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    /// Subscribe to specific event types
    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        let filter = EventFilter::new().with_types(types);
        self.subscribe_filtered(filter)
    }

    /// Get current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get event bus statistics
    pub async fn get_stats(&self) -> EventBusStats {
        let stats = self.stats.read().await;
        EventBusStats {
            total_events: stats.total_events,
            events_by_type: stats.events_by_type.clone(),
            subscriber_count: self.subscriber_count(),
            dropped_events: stats.dropped_events,
        }
    }

    /// Emit a slot activated event
    pub async fn emit_slot_activated(&self, index: usize, entry: &PlaylistEntry) -> Result<()> {
        let event = RotationEvent::new(
            EventType::SlotActivated,
            EventPayload::Slot {
                index,
                media_url: entry.media_url.clone(),
                kind: entry.kind,
            },
        )
        .with_source(EventSource::Carousel);
        self.publish(event).await
    }

    /// Emit a playlist replaced event
    pub async fn emit_playlist_replaced(&self, item_count: usize) -> Result<()> {
        let event = RotationEvent::new(
            EventType::PlaylistReplaced,
            EventPayload::Playlist { item_count },
        )
        .with_source(EventSource::Carousel);
        self.publish(event).await
    }

    /// Emit a playback started event
    pub async fn emit_playback_started(&self, index: usize, media_url: String) -> Result<()> {
        let event = RotationEvent::new(
            EventType::PlaybackStarted,
            EventPayload::Playback { index, media_url },
        )
        .with_source(EventSource::Scheduler);
        self.publish(event).await
    }
}
