use super::Db;
use crate::{Error, Result};

use linkrow_core::driver::operation::Transaction;

use std::{future::Future, pin::Pin};

/// The future returned by the closure passed to [`Db::transaction`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

impl Db {
    /// Starts a transaction on this handle's connection.
    ///
    /// Every operation on this handle runs inside it until
    /// [`commit`](Db::commit) or [`rollback`](Db::rollback). If the handle is
    /// dropped first, the transaction is rolled back.
    pub async fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(Error::usage("a transaction is already open on this handle"));
        }

        self.exec_transaction(Transaction::Start).await?;
        self.in_transaction = true;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::usage("commit() called without begin()"));
        }

        // A failed COMMIT leaves the transaction open on the connection
        self.exec_transaction(Transaction::Commit).await?;
        self.in_transaction = false;
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::usage("rollback() called without begin()"));
        }

        self.exec_transaction(Transaction::Rollback).await?;
        self.in_transaction = false;
        Ok(())
    }

    /// Runs `f` inside a transaction, committing if it returns `Ok` and
    /// rolling back otherwise.
    ///
    /// ```ignore
    /// let movie = db
    ///     .transaction(|db| {
    ///         Box::pin(async move {
    ///             let mut movie = movie;
    ///             db.save(&mut movie).await?;
    ///             Ok(movie)
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a mut Db) -> BoxFuture<'a, Result<T>>,
    {
        self.begin().await?;

        match f(&mut *self).await {
            Ok(value) => match self.commit().await {
                Ok(()) => Ok(value),
                Err(err) => {
                    if let Err(rollback) = self.rollback().await {
                        tracing::warn!(error = %rollback, "rollback after failed commit failed");
                    }
                    Err(err)
                }
            },
            Err(err) => {
                if let Err(rollback) = self.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn exec_transaction(&mut self, op: Transaction) -> Result<()> {
        let (shared, connection) = self.split().await?;
        connection.exec(&shared.engine.schema, op.into()).await?;
        Ok(())
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        if !self.in_transaction {
            return;
        }

        let Some(mut connection) = self.connection.take() else {
            return;
        };

        // Rollback is asynchronous and cannot run in drop. Without a runtime
        // the connection is closed instead, which discards the transaction.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            drop(connection.detach());
            return;
        };

        let schema = self.shared.engine.schema.clone();
        handle.spawn(async move {
            if let Err(err) = connection.exec(&schema, Transaction::Rollback.into()).await {
                tracing::warn!(error = %err, "rollback of dropped transaction failed");
            }
        });
    }
}
