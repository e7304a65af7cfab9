//! Single-writer actor.
//!
//! All mutations funnel through one dedicated SQLite connection, each job
//! wrapped in an immediate transaction. This serializes BUY/SELL bookings
//! (no two sales can read overlapping remaining-quantity snapshots and both
//! commit) and gives every job all-or-nothing semantics: a job that returns
//! an error rolls its whole transaction back.

use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use lotfolio_core::errors::Result;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job: runs against the writer's connection inside a transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> std::result::Result<T, StorageError> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<std::result::Result<Box<dyn Any + Send + 'static>, StorageError>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction; returning an error
    /// rolls everything back. Storage errors are converted to core errors
    /// at this boundary.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, StorageError> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("Writer actor's receiving channel was closed, indicating the actor stopped.");

        ret_rx
            .await
            .expect("Writer actor dropped the reply sender without sending a result.")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Failed to downcast writer actor result."))
            })
            .map_err(Into::into)
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database. The actor owns one connection from the pool and processes
/// write jobs serially, each inside an immediate transaction.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("Failed to get a connection from the DB pool for the writer actor.");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn.immediate_transaction::<_, StorageError, _>(|c| job(c));

            // Ignore a dropped receiver (the request timed out or was
            // cancelled); the transaction outcome already stands.
            let _ = reply_tx.send(result);
        }
        // Channel closed: every WriteHandle is gone, the actor terminates.
    });

    WriteHandle { tx }
}
