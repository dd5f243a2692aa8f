//! Learner-side client for the vocabulary platform.
//!
//! Holds the learner's progress in memory, keeps it in sync with the
//! backend, watches for due words and drives review sessions.

pub mod api;
pub mod app;
pub mod clock;
pub mod config;
pub mod monitor;
pub mod review;
pub mod store;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{BackendApi, HttpBackend};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::store::StoreError;

pub use app::App;
pub use review::{ReviewRunner, Step, StepReport};

const RELOGIN_HINT: &str =
    "backend rejected the API token; log in again and update VOCAB_API_TOKEN";

/// Hydrate the learner's progress and report due words until Ctrl-C or
/// until the backend rejects the token.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;

    tracing::info!("Connecting to {}", config.api_url);
    let api: Arc<dyn BackendApi> =
        Arc::new(HttpBackend::new(&config.api_url, config.api_token.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app = App::new(&config, api, clock);
    tracing::info!(
        learned = ?app.scheduler().intervals.learned,
        review = ?app.scheduler().intervals.review,
        "review intervals (days)"
    );

    match app.store().hydrate().await {
        Ok(_) => {}
        Err(StoreError::Unauthorized) => anyhow::bail!(RELOGIN_HINT),
        Err(e) => return Err(e.into()),
    }

    let mut monitor = app.due_monitor();
    let mut due = monitor.subscribe();
    monitor.start();

    let mut outcome = Ok(());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = due.changed() => {
                if changed.is_err() {
                    break;
                }
                let summary = due.borrow_and_update().clone();
                match summary.last_error {
                    Some(StoreError::Unauthorized) => {
                        outcome = Err(anyhow::anyhow!(RELOGIN_HINT));
                        break;
                    }
                    Some(e) => tracing::warn!(
                        error = %e,
                        retryable = e.is_retryable(),
                        "due words may be out of date"
                    ),
                    None => tracing::info!(count = summary.count, "words due for review"),
                }
            }
        }
    }

    tracing::info!("Shutting down");
    monitor.stop().await;
    app.sign_out();
    outcome
}
