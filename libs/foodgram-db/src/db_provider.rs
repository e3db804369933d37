use std::{future::Future, marker::PhantomData, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::DbError;

/// Thin, reusable DB entrypoint for application services.
///
/// - `conn()` for non-transactional operations
/// - `transaction(...)` for work that must commit or roll back as a unit
///
/// ```ignore
/// let out = self.db.transaction(|tx| Box::pin(async move { /* ... */ })).await?;
/// ```
pub struct DBProvider<E> {
    db: DatabaseConnection,
    _error: PhantomData<fn() -> E>,
}

impl<E> Clone for DBProvider<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _error: PhantomData,
        }
    }
}

impl<E> DBProvider<E>
where
    E: From<DbError> + Send + 'static,
{
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _error: PhantomData,
        }
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Execute a closure inside a database transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns `E` if:
    /// - starting the transaction fails (mapped from `DbError`)
    /// - the closure returns an error
    /// - commit fails (mapped from `DbError`)
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, E>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(
                &'a DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>
            + Send,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(DbError::from)
            .map_err(E::from)?;

        let res = f(&txn).await;

        match res {
            Ok(v) => {
                txn.commit().await.map_err(DbError::from).map_err(E::from)?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    tracing::warn!(error = %rb, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }
}
