//! Terminal operations: hand a compiled [`Request`] to an execution layer.
//!
//! The builder never talks to a database itself. An [`Executor`] receives the
//! bound model identifier plus the compiled request and does the rest
//! (rendering the final statement, expanding `IN(?)` lists, binding, I/O).

use crate::builder::{QueryBuilder, Request};
use crate::error::{QbError, QbResult};
use crate::value::Value;
use std::future::Future;

/// The execution collaborator.
///
/// Implementations surface their own failures as [`QbError::Execution`].
pub trait Executor: Send + Sync {
    /// A loaded model instance.
    type Record: Send;

    /// Load every matching record.
    fn all(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<Vec<Self::Record>>> + Send;

    /// Load the first matching record.
    fn first(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<Option<Self::Record>>> + Send;

    /// Load the last matching record.
    fn last(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<Option<Self::Record>>> + Send;

    /// Count matching records.
    fn count(&self, model: &str, request: &Request)
    -> impl Future<Output = QbResult<u64>> + Send;

    /// Whether any record matches.
    ///
    /// The default implementation delegates to [`Executor::count`].
    fn exists(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<bool>> + Send {
        async move { Ok(self.count(model, request).await? > 0) }
    }

    /// Delete matching records, returning the affected row count.
    fn delete_all(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<u64>> + Send;

    /// Update matching records with `request.set`, returning the affected row count.
    fn update_all(
        &self,
        model: &str,
        request: &Request,
    ) -> impl Future<Output = QbResult<u64>> + Send;
}

impl QueryBuilder {
    fn bound_model(&self, operation: &'static str) -> QbResult<&str> {
        let model = self
            .model_name()
            .ok_or(QbError::MissingModel(operation))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(operation, model, "dispatching query request");

        Ok(model)
    }

    /// Load every matching record of the bound model.
    pub async fn all<E: Executor>(&self, executor: &E) -> QbResult<Vec<E::Record>> {
        let model = self.bound_model("all")?;
        executor.all(model, &self.to_request()).await
    }

    /// Alias of [`QueryBuilder::all`].
    pub async fn find<E: Executor>(&self, executor: &E) -> QbResult<Vec<E::Record>> {
        let model = self.bound_model("find")?;
        executor.all(model, &self.to_request()).await
    }

    pub async fn first<E: Executor>(&self, executor: &E) -> QbResult<Option<E::Record>> {
        let model = self.bound_model("first")?;
        executor.first(model, &self.to_request()).await
    }

    pub async fn last<E: Executor>(&self, executor: &E) -> QbResult<Option<E::Record>> {
        let model = self.bound_model("last")?;
        executor.last(model, &self.to_request()).await
    }

    pub async fn count<E: Executor>(&self, executor: &E) -> QbResult<u64> {
        let model = self.bound_model("count")?;
        executor.count(model, &self.to_request()).await
    }

    pub async fn exists<E: Executor>(&self, executor: &E) -> QbResult<bool> {
        let model = self.bound_model("exists")?;
        executor.exists(model, &self.to_request()).await
    }

    /// Delete matching records. Fails before dispatch if the accumulated
    /// state holds anything besides conditions, limit and order.
    pub async fn delete_all<E: Executor>(&self, executor: &E) -> QbResult<u64> {
        let model = self.bound_model("delete_all")?;
        let request = self.to_delete_request()?;
        executor.delete_all(model, &request).await
    }

    /// Update matching records with `set`. Same restrictions as
    /// [`QueryBuilder::delete_all`].
    pub async fn update_all<E, K, V>(
        &self,
        executor: &E,
        set: impl IntoIterator<Item = (K, V)>,
    ) -> QbResult<u64>
    where
        E: Executor,
        K: Into<String>,
        V: Into<Value>,
    {
        let model = self.bound_model("update_all")?;
        let request = self.to_update_request(set)?;
        executor.update_all(model, &request).await
    }
}
