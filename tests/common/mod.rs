pub mod fixtures;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use marquee::display::Carousel;
use marquee::events::EventBus;
use marquee::player::HeadlessPlayerFactory;
use marquee::services::RotationScheduler;

/// Assembled rotation pipeline with a live scheduler listener, torn down
/// when the context drops.
pub struct TestContext {
    pub bus: Arc<EventBus>,
    pub carousel: Arc<Carousel>,
    pub scheduler: RotationScheduler,
    pub factory: Arc<HeadlessPlayerFactory>,
    shutdown: CancellationToken,
}

impl TestContext {
    pub fn new() -> Self {
        let bus = Arc::new(EventBus::new(64));
        let carousel = Arc::new(Carousel::new(bus.clone()));
        let scheduler = RotationScheduler::new(carousel.clone(), bus.clone());
        let shutdown = CancellationToken::new();
        scheduler.spawn_listener(shutdown.clone());

        Self {
            bus,
            carousel,
            scheduler,
            factory: Arc::new(HeadlessPlayerFactory),
            shutdown,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
