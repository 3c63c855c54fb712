use std::time::Duration;

use crate::common::TestContext;
use crate::common::fixtures::Fixtures;
use marquee::models::MediaKind;
use marquee::player::{HeadlessPlayer, MediaPlayer, PlayerState};
use marquee::services::{PlaylistService, PollerService};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_poll_to_rotation_pipeline() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/playlist")
        .with_status(200)
        .with_body(Fixtures::playlist_body(&[
            ("https://cdn/first.jpg", 5),
            ("https://cdn/second.mp4", 3),
        ]))
        .create_async()
        .await;

    let ctx = TestContext::new();
    let mut poller = PollerService::new(
        reqwest::Client::new(),
        format!("{}/playlist", server.url()),
        Duration::from_millis(50),
    );

    let response = poller.tick().await.unwrap().expect("first poll accepted");
    PlaylistService::render(&ctx.carousel, &ctx.scheduler, ctx.factory.as_ref(), &response)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(ctx.carousel.len().await, 2);
    assert_eq!(ctx.carousel.visible_index().await, Some(0));
    assert_eq!(ctx.scheduler.active_index().await, 0);
    assert!(ctx.scheduler.is_armed().await);

    // Image slot carries no player; the video slot's player is loaded but
    // holds until its slot becomes visible
    assert!(ctx.carousel.slot_player(0).await.is_none());
    let video = ctx.carousel.slot_player(1).await.expect("video player");
    let video = video
        .as_any()
        .downcast_ref::<HeadlessPlayer>()
        .expect("headless backend");
    assert_eq!(video.state().await, PlayerState::Paused);
    assert_eq!(video.play_count(), 0);

    let slot = ctx.carousel.slot(1).await.unwrap();
    assert_eq!(slot.entry.kind, MediaKind::Video);
}

#[tokio::test]
async fn test_unchanged_endpoint_renders_once() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/playlist")
        .with_status(200)
        .with_body(Fixtures::playlist_body(&[("https://cdn/only.jpg", 5)]))
        .expect_at_least(3)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let poller = PollerService::new(
        reqwest::Client::new(),
        format!("{}/playlist", server.url()),
        Duration::from_millis(25),
    );

    let shutdown = CancellationToken::new();
    let canceller = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let carousel = ctx.carousel.clone();
    let scheduler = ctx.scheduler.clone();
    let factory = ctx.factory.clone();
    poller
        .run(shutdown, move |response| {
            let carousel = carousel.clone();
            let scheduler = scheduler.clone();
            let factory = factory.clone();
            async move {
                PlaylistService::render(&carousel, &scheduler, factory.as_ref(), &response)
                    .await
                    .unwrap();
            }
        })
        .await;

    // Several ticks hit the endpoint, but only the first one rebuilt the
    // display
    let stats = ctx.bus.get_stats().await;
    assert_eq!(stats.events_by_type.get("playlist.replaced"), Some(&1));
    assert_eq!(ctx.carousel.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shrinking_playlist_resets_rotation() {
    let ctx = TestContext::new();

    let two_items = PlaylistService::parse_response(Fixtures::playlist_payload(&[
        ("https://cdn/a.jpg", 30),
        ("https://cdn/b.jpg", 30),
    ]))
    .unwrap();
    PlaylistService::render(&ctx.carousel, &ctx.scheduler, ctx.factory.as_ref(), &two_items)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;

    ctx.carousel.show(1).await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(ctx.scheduler.active_index().await, 1);

    // Replacement playlist has a single item with a shorter dwell
    let one_item = PlaylistService::parse_response(Fixtures::playlist_payload(&[(
        "https://cdn/solo.jpg",
        8,
    )]))
    .unwrap();
    PlaylistService::render(&ctx.carousel, &ctx.scheduler, ctx.factory.as_ref(), &one_item)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(ctx.scheduler.item_count().await, 1);
    assert_eq!(ctx.scheduler.active_index().await, 0);
    assert_eq!(ctx.carousel.visible_index().await, Some(0));
    assert!(ctx.scheduler.is_armed().await);

    // The rearmed timer follows the new item's dwell (8s - 1s offset), not
    // the old one's
    let mut activations = ctx
        .bus
        .subscribe_to_types(vec![marquee::events::EventType::SlotActivated]);
    tokio::time::sleep(Duration::from_millis(6_800)).await;
    assert!(activations.try_recv().unwrap().is_none());
    tokio::time::sleep(Duration::from_millis(500)).await;
    let event = activations.try_recv().unwrap().expect("advance fired");
    match event.payload {
        marquee::events::EventPayload::Slot { index, .. } => assert_eq!(index, 0),
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_video_playlist_autoplays_muted_on_activation() {
    let ctx = TestContext::new();

    let playlist = PlaylistService::parse_response(Fixtures::playlist_payload(&[(
        "https://cdn/spot.mp4",
        10,
    )]))
    .unwrap();
    PlaylistService::render(&ctx.carousel, &ctx.scheduler, ctx.factory.as_ref(), &playlist)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;

    let player = ctx.carousel.slot_player(0).await.expect("video player");
    let player = player
        .as_any()
        .downcast_ref::<HeadlessPlayer>()
        .expect("headless backend");
    assert_eq!(player.state().await, PlayerState::Playing);
    assert!(player.is_muted().await);
    assert_eq!(player.play_count(), 1);
}
