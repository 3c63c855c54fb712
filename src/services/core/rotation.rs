use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::constants::{DWELL_RESYNC_OFFSET, MIN_DWELL};
use crate::display::Carousel;
use crate::events::{EventBus, EventPayload, EventType};
use crate::models::{MediaKind, PlaylistEntry, RotationState};
use crate::services::core::playback::PlaybackService;

/// Drives autonomous advancement through the installed slots with per-item
/// dwell times. All rotation-state mutation funnels through `install`,
/// `on_activated`, and `advance`, which together preserve the invariant
/// that at most one advance is ever scheduled.
///
/// The scheduler reacts to activations rather than causing them directly:
/// its timer commands the carousel, and the carousel's activation signal
/// re-enters the scheduler. External activations resynchronize the timer
/// through exactly the same path.
#[derive(Debug, Clone)]
pub struct RotationScheduler {
    state: Arc<Mutex<RotationState>>,
    carousel: Arc<Carousel>,
    bus: Arc<EventBus>,
    autoplay_muted: bool,
}

impl RotationScheduler {
    pub fn new(carousel: Arc<Carousel>, bus: Arc<EventBus>) -> Self {
        Self {
            state: Arc::new(Mutex::new(RotationState::default())),
            carousel,
            bus,
            autoplay_muted: true,
        }
    }

    pub fn with_autoplay_muted(mut self, autoplay_muted: bool) -> Self {
        self.autoplay_muted = autoplay_muted;
        self
    }

    /// Replace the rotation sequence wholesale. Any outstanding advance is
    /// aborted; an empty sequence parks the scheduler until the next render.
    pub async fn install(&self, items: Vec<PlaylistEntry>) {
        let mut state = self.state.lock().await;
        state.replace_items(items);
        if state.is_empty() {
            debug!("Scheduler idle: empty playlist");
        }
    }

    /// Handle slot `index` becoming visible, whatever caused it: record the
    /// new active index, cancel-and-rearm the advance timer against the
    /// slot's dwell, and start muted playback for video slots.
    pub async fn on_activated(&self, index: usize) {
        let entry = {
            let mut state = self.state.lock().await;
            let Some(entry) = state.items.get(index).cloned() else {
                warn!("Ignoring activation for out-of-range slot {}", index);
                return;
            };
            state.active_index = index;
            self.arm(&mut state, &entry);
            entry
        };

        if entry.kind == MediaKind::Video && self.autoplay_muted {
            match self.carousel.slot_player(index).await {
                Some(player) => {
                    if let Err(e) = PlaybackService::start_muted(
                        &self.bus,
                        player.as_ref(),
                        index,
                        &entry.media_url,
                    )
                    .await
                    {
                        warn!("Failed to start playback for slot {}: {}", index, e);
                    }
                }
                None => warn!("Video slot {} has no player attached", index),
            }
        }
    }

    /// The scheduled advance: command the carousel to the next slot. The
    /// carousel's activation signal re-enters `on_activated`, which re-arms
    /// the timer, closing the rotation loop.
    pub async fn advance(&self) {
        let next = {
            let state = self.state.lock().await;
            if state.items.is_empty() {
                return;
            }
            (state.active_index + 1) % state.items.len()
        };
        self.carousel.show(next).await;
    }

    /// Cancel-and-reinstall the single advance timer. Runs with the state
    /// lock held; spawning is synchronous, so nothing awaits under the lock.
    fn arm(&self, state: &mut RotationState, entry: &PlaylistEntry) {
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }

        let delay = entry
            .dwell
            .saturating_sub(DWELL_RESYNC_OFFSET)
            .max(MIN_DWELL);
        debug!("Arming advance for slot {} in {:?}", state.active_index, delay);

        let scheduler = self.clone();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.advance().await;
        }));
    }

    /// Bridge carousel activations into the state machine until shutdown.
    /// The subscription is taken synchronously so no activation published
    /// after this call can be missed.
    pub fn spawn_listener(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let mut events = self.bus.subscribe_to_types(vec![EventType::SlotActivated]);
        let scheduler = self.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(event) => {
                            if let EventPayload::Slot { index, .. } = event.payload {
                                scheduler.on_activated(index).await;
                            }
                        }
                        Err(e) => {
                            warn!("Activation stream closed: {}", e);
                            break;
                        }
                    },
                }
            }
        })
    }

    /// Whether an advance is currently scheduled.
    pub async fn is_armed(&self) -> bool {
        self.state.lock().await.pending.is_some()
    }

    pub async fn active_index(&self) -> usize {
        self.state.lock().await.active_index
    }

    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }
}
