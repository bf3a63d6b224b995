// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded, keyed worker pools.
//!
//! A pool runs a fixed number of workers draining one bounded queue. Every
//! job is keyed by its message id; the key maps to the job's cancel flag
//! for as long as the job is queued or running, which is what makes
//! `cancel` and the duplicate-submit guard work.

use drover_core::CancelFlag;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// A submitted unit of work. Receives the cancel flag it must observe.
pub type JobFn =
    Box<dyn FnOnce(CancelFlag) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + 'static>;

/// Errors from pool submission
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("job already submitted for {0}")]
    DuplicateKey(String),
    #[error("pool {0} saturated")]
    Saturated(&'static str),
    #[error("pool {0} closed")]
    Closed(&'static str),
}

struct PoolJob {
    key: String,
    flag: CancelFlag,
    run: JobFn,
}

type Entries = Arc<Mutex<HashMap<String, CancelFlag>>>;

/// Fixed-size worker pool with keyed, cancellable jobs.
pub struct TaskPool {
    name: &'static str,
    submit_timeout: Duration,
    tx: Mutex<Option<mpsc::Sender<PoolJob>>>,
    entries: Entries,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskPool {
    /// Spawn `worker_count` workers. Must be called inside a tokio runtime.
    pub fn new(name: &'static str, worker_count: usize, submit_timeout: Duration) -> Self {
        let worker_count = worker_count.max(1);
        let (tx, rx) = mpsc::channel::<PoolJob>(worker_count * 2);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let entries: Entries = Arc::new(Mutex::new(HashMap::new()));

        let workers = (0..worker_count)
            .map(|_| spawn_worker(name, rx.clone(), entries.clone()))
            .collect();

        Self {
            name,
            submit_timeout,
            tx: Mutex::new(Some(tx)),
            entries,
            workers: Mutex::new(workers),
        }
    }

    /// Enqueue a job under `key`. Fails when the key is already live, when
    /// the queue stays full past the submit timeout, or after shutdown.
    pub async fn submit(&self, key: &str, job: JobFn) -> Result<(), PoolError> {
        let flag = CancelFlag::new();
        {
            let mut entries = self.entries.lock();
            if entries.contains_key(key) {
                return Err(PoolError::DuplicateKey(key.to_string()));
            }
            entries.insert(key.to_string(), flag.clone());
        }

        let tx = self.tx.lock().clone();
        let Some(tx) = tx else {
            self.entries.lock().remove(key);
            return Err(PoolError::Closed(self.name));
        };

        let job = PoolJob {
            key: key.to_string(),
            flag,
            run: job,
        };
        match tx.send_timeout(job, self.submit_timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                self.entries.lock().remove(key);
                Err(PoolError::Saturated(self.name))
            }
            Err(SendTimeoutError::Closed(_)) => {
                self.entries.lock().remove(key);
                Err(PoolError::Closed(self.name))
            }
        }
    }

    /// Request cancellation of a queued or running job. Returns `false`
    /// when the key is unknown (already completed or never submitted).
    /// Idempotent.
    pub fn cancel(&self, key: &str) -> bool {
        match self.entries.lock().get(key) {
            Some(flag) => {
                flag.cancel();
                true
            }
            None => false,
        }
    }

    /// Close the queue and wait for in-flight jobs to finish.
    pub async fn shutdown(&self) {
        drop(self.tx.lock().take());
        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            let _ = handle.await;
        }
    }
}

fn spawn_worker(
    name: &'static str,
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<PoolJob>>>,
    entries: Entries,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // Hold the receiver lock only while waiting for the next job.
            let job = { rx.lock().await.recv().await };
            let Some(job) = job else { break };

            let key = job.key.clone();
            let span = tracing::info_span!("pool_job", pool = name, key = %key);
            (job.run)(job.flag).instrument(span).await;
            entries.lock().remove(&key);
        }
    })
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
