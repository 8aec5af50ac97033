use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::errors::ReconcileError;
use crate::event::{IncomingEvent, ReconciledEvent};
use crate::reconciler::Reconciler;

/// Default bounded buffer size for both feed channels.
pub const DEFAULT_FEED_CAPACITY: usize = 128;

/// Cloneable handle for pushing chunks into a running feed.
#[derive(Clone, Debug)]
pub struct FeedSender {
    tx: mpsc::Sender<IncomingEvent>,
}

impl FeedSender {
    /// Queues a chunk for reconciliation.
    ///
    /// Waits while the input buffer is full.
    pub async fn send(&self, event: IncomingEvent) -> Result<(), ReconcileError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ReconcileError::FeedClosed)
    }
}

/// A [`Reconciler`] running on its own tokio task.
///
/// Chunks are reconciled one at a time in the order they were queued, so the
/// decisions match what a synchronous caller would get. Both channels are
/// bounded: a producer that never reads decisions stalls once both buffers
/// are full.
pub struct ReconcilerFeed {
    sender: FeedSender,
    rx: mpsc::Receiver<ReconciledEvent>,
    close_tx: watch::Sender<bool>,
    task: JoinHandle<Reconciler>,
}

impl ReconcilerFeed {
    /// Moves `reconciler` onto a new task. Must be called within a tokio runtime.
    pub fn spawn(reconciler: Reconciler, capacity: usize) -> Result<Self, ReconcileError> {
        if capacity == 0 {
            return Err(ReconcileError::Config(
                "feed capacity must be greater than 0".into(),
            ));
        }
        let (in_tx, in_rx) = mpsc::channel(capacity);
        let (out_tx, out_rx) = mpsc::channel(capacity);
        let (close_tx, close_rx) = watch::channel(false);
        let task = tokio::spawn(feed_task(reconciler, in_rx, out_tx, close_rx));
        Ok(Self {
            sender: FeedSender { tx: in_tx },
            rx: out_rx,
            close_tx,
            task,
        })
    }

    /// Returns a handle for queuing chunks from other tasks.
    ///
    /// Handles stop accepting chunks once [`finish`](Self::finish) is called.
    pub fn sender(&self) -> FeedSender {
        self.sender.clone()
    }

    /// Queues a chunk for reconciliation.
    pub async fn send(&self, event: IncomingEvent) -> Result<(), ReconcileError> {
        self.sender.send(event).await
    }

    /// Waits for the next decision. Returns `None` once the feed has stopped
    /// and every decision has been delivered.
    pub async fn next_decision(&mut self) -> Option<ReconciledEvent> {
        self.rx.recv().await
    }

    /// Closes the input side, drains any undelivered decisions, and returns
    /// the reconciler with its final store.
    ///
    /// Chunks already queued are still reconciled. Outstanding [`FeedSender`]
    /// handles do not keep the feed alive; their later sends fail with
    /// [`ReconcileError::FeedClosed`].
    pub async fn finish(self) -> Result<Reconciler, ReconcileError> {
        let Self {
            sender,
            mut rx,
            close_tx,
            task,
        } = self;
        drop(sender);
        let _ = close_tx.send(true);
        let mut drained = 0_usize;
        while rx.recv().await.is_some() {
            drained += 1;
        }
        if drained > 0 {
            debug!(drained, "discarded undelivered decisions on finish");
        }
        task.await
            .map_err(|err| ReconcileError::protocol_msg(format!("feed task ended abnormally: {err}")))
    }
}

async fn feed_task(
    mut reconciler: Reconciler,
    mut rx: mpsc::Receiver<IncomingEvent>,
    tx: mpsc::Sender<ReconciledEvent>,
    mut close_rx: watch::Receiver<bool>,
) -> Reconciler {
    let mut closing = false;
    loop {
        tokio::select! {
            // A dropped feed closes the input the same way `finish` does.
            _ = close_rx.changed(), if !closing => {
                closing = true;
                rx.close();
            }
            next = rx.recv() => {
                let Some(IncomingEvent { stage, run_id, text }) = next else {
                    break;
                };
                let decision = reconciler.reconcile(stage, run_id.clone(), text);
                let sent = tx
                    .send(ReconciledEvent {
                        run_id,
                        stage,
                        decision,
                    })
                    .await;
                if sent.is_err() {
                    debug!("feed decision receiver dropped; stopping");
                    break;
                }
            }
        }
    }
    reconciler
}
