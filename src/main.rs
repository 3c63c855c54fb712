use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use marquee::config::Config;
use marquee::display::Carousel;
use marquee::events::EventBus;
use marquee::player::HeadlessPlayerFactory;
use marquee::services::{PlaylistService, PollerService, RotationScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("marquee=debug")
        .init();

    info!("Starting marquee signage rotator");

    let config = Config::load()?;

    let bus = Arc::new(EventBus::new(64));
    let carousel = Arc::new(Carousel::new(bus.clone()));
    let scheduler = RotationScheduler::new(carousel.clone(), bus.clone())
        .with_autoplay_muted(config.playback.autoplay_muted);
    let factory = Arc::new(HeadlessPlayerFactory);

    let shutdown = CancellationToken::new();
    let listener = scheduler.spawn_listener(shutdown.clone());

    let poller = PollerService::from_config(&config);
    let poll_loop = {
        let carousel = carousel.clone();
        let scheduler = scheduler.clone();
        let factory = factory.clone();
        let shutdown = shutdown.clone();

        tokio::spawn(async move {
            poller
                .run(shutdown, move |response| {
                    let carousel = carousel.clone();
                    let scheduler = scheduler.clone();
                    let factory = factory.clone();
                    async move {
                        if let Err(e) =
                            PlaylistService::render(&carousel, &scheduler, factory.as_ref(), &response)
                                .await
                        {
                            error!("Failed to render playlist: {}", e);
                        }
                    }
                })
                .await;
        })
    };

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    shutdown.cancel();

    let _ = poll_loop.await;
    let _ = listener.await;

    Ok(())
}
