use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::PlaylistResponse;
use crate::services::core::playlist::PlaylistService;

/// One playlist poll gone wrong. Every variant is swallowed at the loop
/// boundary and is indistinguishable from "no change" downstream.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Endpoint returned status {0}")]
    Http(StatusCode),

    #[error("Body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Owns the fixed-interval playlist polling loop and its change detection.
///
/// There is no retry backoff and no circuit breaker: a failed tick waits
/// for the next fixed-interval tick exactly like an unchanged one.
pub struct PollerService {
    client: reqwest::Client,
    endpoint: String,
    interval: Duration,
    last_accepted: Option<Value>,
}

impl PollerService {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, interval: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            interval,
            last_accepted: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self::new(client, config.endpoint_url(), config.poll_interval())
    }

    /// Run the poll loop until shutdown. `on_change` fires only for
    /// accepted responses; the loop itself never fails.
    pub async fn run<F, Fut>(mut self, shutdown: CancellationToken, mut on_change: F)
    where
        F: FnMut(PlaylistResponse) -> Fut,
        Fut: Future<Output = ()>,
    {
        info!(
            "Starting playlist poll loop against {} every {:?}",
            self.endpoint, self.interval
        );

        loop {
            // A failed tick is treated exactly like "no change"; the next
            // tick is scheduled no matter what happened on this one.
            match self.tick().await {
                Ok(Some(response)) => on_change(response).await,
                Ok(None) => {}
                Err(e) => warn!("Playlist poll failed: {}", e),
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Playlist poll loop shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// One fetch-and-compare cycle. Returns `Ok(Some)` only when the body
    /// is structurally different from the last accepted payload.
    pub async fn tick(&mut self) -> Result<Option<PlaylistResponse>, PollError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PollError::Http(status));
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;

        if self.last_accepted.as_ref() == Some(&payload) {
            debug!("Playlist unchanged, skipping dispatch");
            return Ok(None);
        }

        debug!("Playlist response accepted: {}", payload);
        self.last_accepted = Some(payload.clone());

        match PlaylistService::parse_response(payload) {
            Ok(response) => Ok(Some(response)),
            Err(e) => {
                // Accepted for change detection, but there is nothing to
                // render; wait for the endpoint to produce a playlist again.
                warn!("Accepted payload is not a playlist: {}", e);
                Ok(None)
            }
        }
    }
}
