use crate::{DbError, StatsStore};
use async_trait::async_trait;
use core_types::{County, Indicator, Observation};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Puts a deadline on every call to the wrapped store.
///
/// `statement_timeout` only covers time spent inside PostgreSQL; this also
/// covers a stalled socket or a store that never answers. Dropping the
/// inner future on expiry releases its pooled connection.
#[derive(Clone)]
pub struct TimedStore {
    inner: Arc<dyn StatsStore>,
    limit: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn StatsStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        query: impl Future<Output = Result<T, DbError>>,
    ) -> Result<T, DbError> {
        tokio::time::timeout(self.limit, query).await.map_err(|_| {
            tracing::warn!(operation, limit = ?self.limit, "Query timed out.");
            DbError::Timeout(self.limit)
        })?
    }
}

#[async_trait]
impl StatsStore for TimedStore {
    async fn list_counties(&self) -> Result<Vec<County>, DbError> {
        self.bounded("list_counties", self.inner.list_counties()).await
    }

    async fn get_county(&self, id: i32) -> Result<County, DbError> {
        self.bounded("get_county", self.inner.get_county(id)).await
    }

    async fn list_indicators(&self) -> Result<Vec<Indicator>, DbError> {
        self.bounded("list_indicators", self.inner.list_indicators()).await
    }

    async fn get_observations(
        &self,
        indicator_code: &str,
        year: i32,
    ) -> Result<Vec<Observation>, DbError> {
        self.bounded(
            "get_observations",
            self.inner.get_observations(indicator_code, year),
        )
        .await
    }
}
