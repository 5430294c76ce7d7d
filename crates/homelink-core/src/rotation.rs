// ── Credential rotation listener ──
//
// Two background tasks, decoupled from reconciliation passes:
//
//   listener  BroadcastStream of rotation events -> mpsc queue
//   persist   single consumer; rewrites the stored credential one event
//             at a time so concurrent rotations never race on the file
//
// Failures are logged and counted. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use homelink_api::RefreshTokenRotation;

use crate::error::CoreError;

const PERSIST_QUEUE_SIZE: usize = 32;

/// Durable home of the refresh credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Replace `old` with `new` in place. Returns `false` when `old` was
    /// not found and nothing was written.
    async fn replace_credential(
        &self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<bool, CoreError>;
}

/// Running totals, observable through [`RotationListener::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RotationStats {
    pub persisted: u64,
    /// Old credential not present in the store.
    pub unmatched: u64,
    /// Events without a previous credential.
    pub skipped: u64,
    pub failed: u64,
    /// Events dropped because the listener fell behind the broadcast.
    pub lagged: u64,
}

struct PersistRequest {
    old: SecretString,
    new: SecretString,
}

/// Handle to the running listener and persist worker.
pub struct RotationListener {
    cancel: CancellationToken,
    stats: watch::Receiver<RotationStats>,
    handles: Vec<JoinHandle<()>>,
}

impl RotationListener {
    /// Subscribe to `rotations` and persist every event into `store`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        rotations: broadcast::Receiver<RefreshTokenRotation>,
        store: Arc<dyn CredentialStore>,
        cancel: CancellationToken,
    ) -> Self {
        let (stats_tx, stats) = watch::channel(RotationStats::default());
        let stats_tx = Arc::new(stats_tx);
        let (persist_tx, persist_rx) = mpsc::channel(PERSIST_QUEUE_SIZE);

        let listener = tokio::spawn(listen_task(
            rotations,
            persist_tx,
            Arc::clone(&stats_tx),
            cancel.clone(),
        ));
        let worker = tokio::spawn(persist_task(persist_rx, store, stats_tx));

        Self {
            cancel,
            stats,
            handles: vec![listener, worker],
        }
    }

    pub fn stats(&self) -> watch::Receiver<RotationStats> {
        self.stats.clone()
    }

    /// Stop listening, let the worker finish queued writes, and join both tasks.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "rotation task ended abnormally");
            }
        }
    }
}

async fn listen_task(
    rotations: broadcast::Receiver<RefreshTokenRotation>,
    persist_tx: mpsc::Sender<PersistRequest>,
    stats: Arc<watch::Sender<RotationStats>>,
    cancel: CancellationToken,
) {
    let mut stream = BroadcastStream::new(rotations);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            item = stream.next() => match item {
                None => {
                    debug!("rotation stream closed");
                    break;
                }
                Some(Ok(rotation)) => {
                    let Some(old) = rotation.previous().cloned() else {
                        debug!("rotation without a previous token, nothing to replace");
                        stats.send_modify(|s| s.skipped += 1);
                        continue;
                    };
                    let request = PersistRequest { old, new: rotation.new };
                    if persist_tx.send(request).await.is_err() {
                        warn!("persist worker gone, dropping rotation");
                        break;
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(missed))) => {
                    warn!(missed, "rotation listener lagged, events dropped");
                    stats.send_modify(|s| s.lagged += missed);
                }
            }
        }
    }
}

async fn persist_task(
    mut rx: mpsc::Receiver<PersistRequest>,
    store: Arc<dyn CredentialStore>,
    stats: Arc<watch::Sender<RotationStats>>,
) {
    while let Some(PersistRequest { old, new }) = rx.recv().await {
        match store.replace_credential(&old, &new).await {
            Ok(true) => {
                info!("persisted rotated refresh token");
                stats.send_modify(|s| s.persisted += 1);
            }
            Ok(false) => {
                warn!("previous refresh token not found in configuration, left unchanged");
                stats.send_modify(|s| s.unmatched += 1);
            }
            Err(e) => {
                error!(error = %e, "failed to persist rotated refresh token");
                stats.send_modify(|s| s.failed += 1);
            }
        }
    }
}
