use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::Slot;
use crate::events::EventBus;
use crate::player::MediaPlayer;

/// Rotation-advance primitive: owns the installed slot sequence and the
/// visible index, and announces every visibility change on the event bus.
/// The carousel never schedules anything itself; automatic advancement is
/// the rotation scheduler reacting to these announcements.
#[derive(Debug)]
pub struct Carousel {
    slots: RwLock<Vec<Slot>>,
    visible: RwLock<Option<usize>>,
    bus: Arc<EventBus>,
}

impl Carousel {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            visible: RwLock::new(None),
            bus,
        }
    }

    /// Replace the whole slot sequence. The swap is atomic from a reader's
    /// perspective; visibility resets, and slot 0 is shown for a non-empty
    /// sequence so its activation re-arms the scheduler.
    pub async fn install(&self, slots: Vec<Slot>) {
        let count = slots.len();
        {
            let mut current = self.slots.write().await;
            *current = slots;
            *self.visible.write().await = None;
        }
        debug!("Installed {} slots", count);

        if let Err(e) = self.bus.emit_playlist_replaced(count).await {
            warn!("Failed to announce playlist replacement: {}", e);
        }

        if count > 0 {
            self.show(0).await;
        }
    }

    /// Make slot `index` the visible one and announce the activation.
    pub async fn show(&self, index: usize) {
        let entry = {
            let slots = self.slots.read().await;
            let Some(slot) = slots.get(index) else {
                warn!("Ignoring show for out-of-range slot {}", index);
                return;
            };
            *self.visible.write().await = Some(index);
            slot.entry.clone()
        };

        debug!("Slot {} now visible: {}", index, entry.media_url);
        if let Err(e) = self.bus.emit_slot_activated(index, &entry).await {
            warn!("Failed to announce slot activation: {}", e);
        }
    }

    /// Advance to the slot after the visible one, wrapping at the end.
    pub async fn next(&self) {
        let target = {
            let slots = self.slots.read().await;
            if slots.is_empty() {
                return;
            }
            match *self.visible.read().await {
                Some(index) => (index + 1) % slots.len(),
                None => 0,
            }
        };
        self.show(target).await;
    }

    pub async fn visible_index(&self) -> Option<usize> {
        *self.visible.read().await
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    pub async fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.read().await.get(index).cloned()
    }

    pub async fn slot_player(&self, index: usize) -> Option<Arc<dyn MediaPlayer>> {
        self.slots
            .read()
            .await
            .get(index)
            .and_then(|slot| slot.player().cloned())
    }
}
