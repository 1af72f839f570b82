use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::domain::DomainError;
use crate::ports::KeyValueStore;

/// Commands sent to the writer task.
enum WriteCommand {
    Write(String),
    Flush { reply: oneshot::Sender<()> },
}

/// Fire-and-forget writer for a single storage key.
///
/// Mutations hand over a serialized snapshot and return immediately. A
/// background task applies writes in the order they were issued; snapshots
/// that were already superseded when the task picks them up are skipped, so
/// the newest snapshot always ends up on disk. Failures are logged and
/// dropped; the next mutation is the retry.
pub struct PersistWriter {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    cmd_tx: mpsc::UnboundedSender<WriteCommand>,
}

impl PersistWriter {
    /// Start the writer task. Must be called from inside a Tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_main(Arc::clone(&store), key, cmd_rx));
        Self { key, store, cmd_tx }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the currently persisted value.
    pub async fn read(&self) -> Result<Option<String>, DomainError> {
        self.store.get(self.key).await
    }

    /// Queue `value` to be written. Never blocks.
    pub fn persist(&self, value: String) {
        if self.cmd_tx.send(WriteCommand::Write(value)).is_err() {
            warn!(key = self.key, "Writer task gone, dropping write");
        }
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.cmd_tx.send(WriteCommand::Flush { reply }).is_ok() {
            let _ = done.await;
        }
    }
}

async fn writer_main(
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    mut cmd_rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let mut latest = match cmd {
            WriteCommand::Write(value) => value,
            WriteCommand::Flush { reply } => {
                let _ = reply.send(());
                continue;
            }
        };

        // Coalesce writes that queued up behind this one
        let mut superseded = 0usize;
        let mut pending_flush = None;
        while let Ok(next) = cmd_rx.try_recv() {
            match next {
                WriteCommand::Write(value) => {
                    latest = value;
                    superseded += 1;
                }
                WriteCommand::Flush { reply } => {
                    pending_flush = Some(reply);
                    break;
                }
            }
        }

        match store.set(key, &latest).await {
            Ok(()) => debug!(key, bytes = latest.len(), superseded, "Persisted"),
            Err(e) => error!(key, error = %e, "Failed to persist, keeping in-memory state"),
        }

        if let Some(reply) = pending_flush {
            let _ = reply.send(());
        }
    }
    debug!(key, "Writer task shutting down");
}
