use std::{sync::Arc, time::Duration};

use dashmap::{mapref::entry::Entry, DashMap};
use futures::{future::join_all, FutureExt};
use tokio::{
    runtime::Handle,
    task::{JoinError, JoinHandle},
};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    entities::trend::{trend_key, TrendCacheEntry, TrendItem},
    repositories::scraper::TrendScraper,
};

/// Stale-while-revalidate cache of scraped trend images, keyed by brand/model.
///
/// - no entry: scrape inline; only a non-empty result is stored
/// - entry younger than the TTL: served as is
/// - older entry: served as is while one supervised background task refreshes it
///
/// An entry is only ever replaced by a non-empty scrape, so a flaky scraper can
/// never blank out data that was good once.
#[derive(Clone)]
pub struct TrendCache {
    inner: Arc<TrendCacheInner>,
}

struct TrendCacheInner {
    scraper: Arc<dyn TrendScraper>,
    entries: DashMap<String, TrendCacheEntry>,
    refreshes: DashMap<String, JoinHandle<()>>,
    ttl: Duration,
    /// Runtime the cache was built on. Refreshes run here rather than on the
    /// HTTP worker runtime that happened to serve the request, since worker
    /// runtimes are torn down when the server stops.
    runtime: Option<Handle>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrendCacheStats {
    pub cached_keys: usize,
    pub refreshes_in_flight: usize,
}

impl TrendCache {
    pub fn new(scraper: Arc<dyn TrendScraper>, ttl: Duration) -> Self {
        TrendCache {
            inner: Arc::new(TrendCacheInner {
                scraper,
                entries: DashMap::new(),
                refreshes: DashMap::new(),
                ttl,
                runtime: Handle::try_current().ok(),
            }),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_trends(&self, brand: &str, model: &str) -> Vec<TrendItem> {
        let key = trend_key(brand, model);

        // The map guard must be gone before anything below awaits.
        let cached = self
            .inner
            .entries
            .get(&key)
            .map(|entry| (entry.data.clone(), entry.timestamp.elapsed() < self.inner.ttl));

        match cached {
            Some((data, true)) => {
                debug!(%key, "Trend cache hit");
                data
            }
            Some((data, false)) => {
                debug!(%key, "Serving stale trends while refreshing");
                self.spawn_refresh(key, brand, model);
                data
            }
            None => self.populate(key, brand, model).await,
        }
    }

    async fn populate(&self, key: String, brand: &str, model: &str) -> Vec<TrendItem> {
        match self.inner.scraper.scrape(brand, model).await {
            Ok(items) if !items.is_empty() => {
                info!(%key, count = items.len(), "Trend cache populated");
                self.inner.entries.insert(key, TrendCacheEntry::new(items.clone()));
                items
            }
            Ok(_) => {
                debug!(%key, "Scrape returned no trends; nothing cached");
                Vec::new()
            }
            Err(e) => {
                warn!(%key, error = %e, "Trend scrape failed; nothing cached");
                Vec::new()
            }
        }
    }

    /// Starts a background refresh for `key` unless one is already running.
    fn spawn_refresh(&self, key: String, brand: &str, model: &str) {
        match self.inner.refreshes.entry(key.clone()) {
            Entry::Occupied(running) if !running.get().is_finished() => {
                debug!(%key, "Refresh already in flight");
            }
            Entry::Occupied(mut finished) => {
                let handle = self.start_refresh_task(key, brand, model);
                let previous = finished.insert(handle);
                log_join_outcome(finished.key(), previous.now_or_never());
            }
            Entry::Vacant(slot) => {
                let handle = self.start_refresh_task(key, brand, model);
                slot.insert(handle);
            }
        }
    }

    fn start_refresh_task(&self, key: String, brand: &str, model: &str) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let brand = brand.to_string();
        let model = model.to_string();

        let runtime = inner.runtime.clone();
        let refresh = async move {
            match inner.scraper.scrape(&brand, &model).await {
                Ok(items) if !items.is_empty() => {
                    info!(%key, count = items.len(), "Trend cache refreshed");
                    inner.entries.insert(key, TrendCacheEntry::new(items));
                }
                Ok(_) => {
                    warn!(%key, "Refresh returned no trends; keeping stale entry");
                }
                Err(e) => {
                    warn!(%key, error = %e, "Trend refresh failed; keeping stale entry");
                }
            }
        };

        match runtime {
            Some(runtime) => runtime.spawn(refresh),
            None => tokio::spawn(refresh),
        }
    }

    pub fn stats(&self) -> TrendCacheStats {
        TrendCacheStats {
            cached_keys: self.inner.entries.len(),
            refreshes_in_flight: self
                .inner
                .refreshes
                .iter()
                .filter(|r| !r.value().is_finished())
                .count(),
        }
    }

    fn take_refreshes(&self) -> Vec<(String, JoinHandle<()>)> {
        let keys: Vec<String> = self.inner.refreshes.iter().map(|r| r.key().clone()).collect();
        keys.into_iter()
            .filter_map(|k| self.inner.refreshes.remove(&k))
            .collect()
    }

    /// Waits for every background refresh started so far and logs how each ended.
    pub async fn wait_for_refreshes(&self) {
        let (keys, handles): (Vec<_>, Vec<_>) = self.take_refreshes().into_iter().unzip();
        for (key, outcome) in keys.iter().zip(join_all(handles).await) {
            log_join_outcome(key, Some(outcome));
        }
    }

    /// Drains background refreshes, aborting whatever is still running after `grace`.
    pub async fn shutdown(&self, grace: Duration) {
        let pending = self.take_refreshes();
        if pending.is_empty() {
            return;
        }

        info!(count = pending.len(), "Waiting for trend refreshes to finish");
        let aborts: Vec<_> = pending.iter().map(|(_, h)| h.abort_handle()).collect();
        let (keys, handles): (Vec<_>, Vec<_>) = pending.into_iter().unzip();

        match tokio::time::timeout(grace, join_all(handles)).await {
            Ok(outcomes) => {
                for (key, outcome) in keys.iter().zip(outcomes) {
                    log_join_outcome(key, Some(outcome));
                }
            }
            Err(_) => {
                warn!("Trend refreshes did not finish within {:?}; aborting", grace);
                aborts.iter().for_each(|a| a.abort());
            }
        }
    }
}

fn log_join_outcome(key: &str, outcome: Option<Result<(), JoinError>>) {
    match outcome {
        Some(Err(e)) if e.is_panic() => error!(%key, "Trend refresh task panicked"),
        Some(Err(_)) => warn!(%key, "Trend refresh task was cancelled"),
        _ => {}
    }
}
