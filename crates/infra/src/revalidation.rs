//! Best-effort notification of the static-site regenerator.
//!
//! Handlers call [`Revalidator::notify`], which never blocks and never fails.
//! A single background worker drains a bounded queue and POSTs the shared
//! secret to the configured URL. Failures are logged and dropped; nothing is
//! retried.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Where (and with which secret) to send revalidation requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevalidationTarget {
    pub url: Option<String>,
    pub secret: String,
}

#[derive(Debug, Error)]
pub enum RevalidationError {
    #[error("revalidation URL is not set")]
    NotConfigured,

    #[error("revalidation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("revalidation failed with status code: {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct RevalidationBody<'a> {
    secret: &'a str,
}

/// POST the shared secret to the target once.
pub async fn send_revalidation(client: &reqwest::Client, target: &RevalidationTarget) -> Result<(), RevalidationError> {
    let url = target.url.as_deref().ok_or(RevalidationError::NotConfigured)?;

    let response = client
        .post(url)
        .json(&RevalidationBody { secret: &target.secret })
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(RevalidationError::Status(status.as_u16()));
    }
    Ok(())
}

/// Cloneable handle used by request handlers.
#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: mpsc::Sender<&'static str>,
}

/// The background worker behind a [`Revalidator`].
#[derive(Debug)]
pub struct RevalidationWorker {
    join: JoinHandle<()>,
}

impl Revalidator {
    /// Start the worker with a queue of `queue_depth` pending requests.
    pub fn spawn(target: RevalidationTarget, client: reqwest::Client, queue_depth: usize) -> (Self, RevalidationWorker) {
        let (tx, mut rx) = mpsc::channel::<&'static str>(queue_depth.max(1));

        let join = tokio::spawn(async move {
            while let Some(reason) = rx.recv().await {
                match send_revalidation(&client, &target).await {
                    Ok(()) => tracing::info!(reason, "revalidation triggered successfully"),
                    Err(RevalidationError::NotConfigured) => {
                        tracing::info!(reason, "NEXT_REVALIDATION_URL is not set; skipping revalidation")
                    }
                    Err(RevalidationError::Status(code)) => {
                        tracing::warn!(reason, code, "revalidation failed with status code")
                    }
                    Err(e) => tracing::warn!(reason, error = %e, "error triggering revalidation"),
                }
            }
        });

        (Self { tx }, RevalidationWorker { join })
    }

    /// Queue a revalidation. Drops the request when the queue is full.
    pub fn notify(&self, reason: &'static str) {
        match self.tx.try_send(reason) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(reason, "revalidation queue full; dropping request")
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(reason, "revalidation worker stopped; dropping request")
            }
        }
    }
}

impl RevalidationWorker {
    /// Wait for queued requests to finish once every [`Revalidator`] handle
    /// is dropped. Returns `false` if `timeout` elapsed first; the worker is
    /// then abandoned.
    pub async fn drain(self, timeout: Duration) -> bool {
        let abort = self.join.abort_handle();
        match tokio::time::timeout(timeout, self.join).await {
            Ok(_) => true,
            Err(_) => {
                abort.abort();
                false
            }
        }
    }
}
