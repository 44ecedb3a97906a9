//! Serialization point for outbound payloads.
//!
//! Concurrent print requests land in one FIFO queue drained by a single
//! worker task, so bytes from different callers never interleave on the
//! wire. Each enqueued job carries a oneshot sender the worker resolves with
//! the delivery result.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{Mutex, Notify, oneshot};
use tokio::task::JoinHandle;

use crate::connection::DeviceConnection;
use crate::error::WriteError;

/// Handle the caller awaits for the delivery result of one enqueued payload.
pub type JobHandle = oneshot::Receiver<Result<(), WriteError>>;

/// One queued unit of bytes awaiting delivery. Immutable payload, consumed
/// exactly once by the drain worker.
struct PrintJob {
    sequence: u64,
    payload: Vec<u8>,
    respond_to: oneshot::Sender<Result<(), WriteError>>,
}

struct QueueInner {
    jobs: Mutex<VecDeque<PrintJob>>,
    notify: Notify,
    next_sequence: AtomicU64,
    shutdown: AtomicBool,
}

/// FIFO write queue with a single drain worker.
///
/// Jobs are delivered strictly in enqueue order. A failed job resolves its
/// own handle with the error and the worker keeps draining; once the
/// connection is poisoned every remaining job resolves with `NotConnected`
/// until the caller reconnects.
pub struct WriteQueue {
    inner: Arc<QueueInner>,
    worker: Option<JoinHandle<()>>,
}

impl WriteQueue {
    /// Spawn the drain worker against a shared connection.
    pub fn new(connection: Arc<Mutex<DeviceConnection>>) -> Self {
        let inner = Arc::new(QueueInner {
            jobs: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            next_sequence: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        });
        let worker = tokio::spawn(drain(inner.clone(), connection));
        Self {
            inner,
            worker: Some(worker),
        }
    }

    /// Append a payload and return a handle resolving with its delivery
    /// result. Returns immediately; delivery happens on the worker.
    pub async fn enqueue(&self, payload: Vec<u8>) -> JobHandle {
        let (respond_to, handle) = oneshot::channel();
        let sequence = self.inner.next_sequence.fetch_add(1, Ordering::Relaxed);
        let job = PrintJob {
            sequence,
            payload,
            respond_to,
        };
        self.inner.jobs.lock().await.push_back(job);
        self.inner.notify.notify_one();
        handle
    }

    /// Resolve every queued-but-undelivered job with
    /// [`WriteError::Cancelled`]. An in-flight write is not interrupted.
    /// Returns the number of jobs cancelled.
    pub async fn cancel_pending(&self) -> usize {
        let drained: Vec<PrintJob> = self.inner.jobs.lock().await.drain(..).collect();
        let cancelled = drained.len();
        for job in drained {
            tracing::debug!("Cancelling print job #{}", job.sequence);
            let _ = job.respond_to.send(Err(WriteError::Cancelled));
        }
        if cancelled > 0 {
            tracing::info!("Cancelled {} pending print job(s)", cancelled);
        }
        cancelled
    }

    /// Stop the worker after the queue is empty and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.inner.shutdown.store(true, Ordering::Release);
        self.inner.notify.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        // Wakes an idle worker so it can observe shutdown; a worker dropped
        // mid-runtime-teardown is aborted with its runtime.
        self.inner.shutdown.store(true, Ordering::Release);
        self.inner.notify.notify_one();
    }
}

async fn drain(inner: Arc<QueueInner>, connection: Arc<Mutex<DeviceConnection>>) {
    loop {
        let job = inner.jobs.lock().await.pop_front();
        match job {
            Some(job) => {
                let result = {
                    let mut conn = connection.lock().await;
                    conn.write(&job.payload).await
                };
                match &result {
                    Ok(()) => tracing::debug!("Print job #{} delivered", job.sequence),
                    Err(e) => tracing::warn!("Print job #{} failed: {}", job.sequence, e),
                }
                // The caller may have dropped its handle; delivery already
                // happened either way.
                let _ = job.respond_to.send(result);
            }
            None => {
                if inner.shutdown.load(Ordering::Acquire) {
                    break;
                }
                inner.notify.notified().await;
            }
        }
    }
    tracing::debug!("Write queue worker stopped");
}
