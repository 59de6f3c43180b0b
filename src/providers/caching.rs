use crate::core::cache::Cache;
use crate::core::{CurrencyCode, RateProvider, RateSeries, RateTable};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RateKey {
    Latest(CurrencyCode),
    Historical(CurrencyCode, NaiveDate),
    Series(CurrencyCode, NaiveDate, NaiveDate),
}

/// One slot per key. Concurrent lookups of the same key wait on the first
/// fetch instead of sending their own request.
type Slot<V> = Arc<OnceCell<V>>;

/// Memoises successful lookups of the wrapped provider for the lifetime of
/// the process. Failures are not cached so a retry hits the network again.
#[derive(Clone)]
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    tables: Cache<RateKey, Slot<RateTable>>,
    series: Cache<RateKey, Slot<RateSeries>>,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            tables: Cache::new(),
            series: Cache::new(),
        }
    }
}

async fn memoise<V, F, Fut>(cache: &Cache<RateKey, Slot<V>>, key: RateKey, fetch: F) -> Result<V>
where
    V: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    let slot = cache
        .get_or_insert_with(key, || Arc::new(OnceCell::new()))
        .await;
    let value = slot.get_or_try_init(fetch).await?;
    Ok(value.clone())
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable> {
        memoise(&self.tables, RateKey::Latest(base.clone()), || {
            self.inner.latest_rates(base)
        })
        .await
    }

    async fn historical_rates(&self, base: &CurrencyCode, date: NaiveDate) -> Result<RateTable> {
        memoise(&self.tables, RateKey::Historical(base.clone(), date), || {
            self.inner.historical_rates(base, date)
        })
        .await
    }

    async fn rate_series(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RateSeries> {
        memoise(&self.series, RateKey::Series(base.clone(), from, to), || {
            self.inner.rate_series(base, from, to)
        })
        .await
    }
}
