//! Live, invalidatable rule cache.
//!
//! Lookups never wait for the network: a miss records the airport as pending,
//! launches a fetch and reports [`AirportStatus::Pending`]; the caller polls
//! again later. Fetch tasks live in a [`JoinSet`] owned by the cache and are
//! aborted when it is dropped. Each task carries the cache generation seen at
//! launch and only applies its result if the generation is unchanged, so
//! [`LiveSource::invalidate`] discards everything in flight.

use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};

use vfpc_core::models::{DateTime, Sid};
use vfpc_core::source::{index_airports, read_snapshot, AirportStatus, SidIndex, Source};
use vfpc_core::SnapshotError;

use crate::client::{FetchError, RuleClient};
use crate::config::{normalize_url, SourceConfig};

#[derive(Debug, Default)]
struct Cache {
    pending: HashSet<String>,
    missing: HashSet<String>,
    error: HashSet<String>,
    sids: SidIndex,
}

impl Cache {
    fn status(&self, icao: &str) -> Option<AirportStatus> {
        if self.error.contains(icao) {
            Some(AirportStatus::Error)
        } else if self.missing.contains(icao) {
            Some(AirportStatus::Missing)
        } else if self.pending.contains(icao) {
            Some(AirportStatus::Pending)
        } else if self.sids.contains_key(icao) {
            Some(AirportStatus::Resolved)
        } else {
            None
        }
    }

    /// Drop `icao` from every state but resolved.
    fn resolve(&mut self, icao: &str) {
        self.pending.remove(icao);
        self.missing.remove(icao);
        self.error.remove(icao);
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.missing.clear();
        self.error.clear();
        self.sids.clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the cache handle and its fetch tasks.
struct Shared {
    client: RuleClient,
    base_url: Mutex<String>,
    generation: AtomicU64,
    cache: Mutex<Cache>,
    datetime: Mutex<DateTime>,
}

impl Shared {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn base_url(&self) -> String {
        lock(&self.base_url).clone()
    }

    async fn fetch_airport(&self, base_url: String, icao: String, generation: u64) {
        tracing::trace!(%icao, "requesting airport");
        let result = self.client.fetch_airport(&base_url, &icao).await;

        let mut cache = lock(&self.cache);
        if self.generation() != generation {
            tracing::trace!(%icao, "discarding fetch result after invalidation");
            return;
        }

        cache.pending.remove(&icao);

        match result {
            Ok(airports) => {
                let codes = index_airports(airports, &mut cache.sids);
                for code in &codes {
                    cache.resolve(code);
                }

                if codes.contains(&icao) {
                    tracing::debug!(%icao, "airport request complete");
                } else if !cache.sids.contains_key(&icao) {
                    tracing::warn!(%icao, "airport missing from server response");
                    cache.missing.insert(icao);
                }
            }
            Err(_) if cache.sids.contains_key(&icao) => {
                tracing::trace!(%icao, "airport already resolved by another response");
            }
            Err(FetchError::NotFound(_)) => {
                tracing::debug!(%icao, "server has no data for airport");
                cache.missing.insert(icao);
            }
            Err(err) => {
                tracing::warn!(%icao, error = %err, "airport request failed");
                cache.error.insert(icao);
            }
        }
    }

    async fn refresh_datetime(&self, base_url: String, generation: u64) {
        let version = match self.client.fetch_version(&base_url).await {
            Ok(version) => version,
            Err(err) => {
                tracing::warn!(error = %err, "reference time update failed");
                return;
            }
        };

        // generation only changes under the cache lock
        let _fence = lock(&self.cache);
        if self.generation() != generation {
            tracing::trace!("discarding reference time after invalidation");
            return;
        }

        let datetime = version.datetime();
        *lock(&self.datetime) = datetime;

        tracing::debug!(
            api_version = %version.api_version,
            day = ?datetime.date,
            time = ?datetime.time,
            "reference time updated"
        );
    }
}

/// Rule source backed by the rule server.
///
/// Fetches run on the runtime behind `runtime`; the [`Source`] methods
/// themselves are synchronous and may be called from any thread.
pub struct LiveSource {
    shared: Arc<Shared>,
    default_url: String,
    tasks: Mutex<JoinSet<()>>,
    runtime: Handle,
}

impl LiveSource {
    /// Create a cache for the server in `config`, fetch the reference time and
    /// keep refreshing it every `config.refresh_period`.
    pub fn new(config: &SourceConfig, runtime: Handle) -> Result<Self, FetchError> {
        let default_url = normalize_url(&config.source_url);

        let source = Self {
            shared: Arc::new(Shared {
                client: RuleClient::new(config.fetch_timeout)?,
                base_url: Mutex::new(default_url.clone()),
                generation: AtomicU64::new(0),
                cache: Mutex::new(Cache::default()),
                datetime: Mutex::new(DateTime::default()),
            }),
            default_url,
            tasks: Mutex::new(JoinSet::new()),
            runtime,
        };

        source.update();
        source.spawn_refresh(config.refresh_period);
        Ok(source)
    }

    /// Base URL fetches are currently made against.
    pub fn base_url(&self) -> String {
        self.shared.base_url()
    }

    /// Change where rules come from.
    ///
    /// `None` restores the configured server and a value containing `://`
    /// selects another server. Neither drops cached data; follow with
    /// [`invalidate`](Self::invalidate) for that. Anything else is read as a
    /// path to a local airport document, which replaces the cache outright.
    pub fn set(&self, source: Option<&str>) -> Result<(), SnapshotError> {
        match source {
            None => {
                tracing::trace!("resetting source");
                *lock(&self.shared.base_url) = self.default_url.clone();
            }
            Some(url) if url.contains("://") => {
                tracing::trace!(%url, "setting new web source");
                *lock(&self.shared.base_url) = normalize_url(url);
            }
            Some(path) => {
                tracing::trace!(%path, "loading file source");
                self.load_snapshot(path)?;
            }
        }

        Ok(())
    }

    fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let airports = read_snapshot(path)?;

        let mut cache = lock(&self.shared.cache);
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        cache.clear();

        let codes = index_airports(airports, &mut cache.sids);
        drop(cache);

        tracing::debug!(airports = codes.len(), "file source loaded");
        self.update();
        Ok(())
    }

    /// Forget all cached rules and airport states.
    ///
    /// Fetches already in flight complete but their results are discarded,
    /// so the reference time is fetched again.
    pub fn invalidate(&self) {
        let mut cache = lock(&self.shared.cache);
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        cache.clear();
        drop(cache);

        tracing::debug!(generation, "cache invalidated");
        self.update();
    }

    /// Refresh the reference time in the background.
    pub fn update(&self) {
        tracing::trace!("update triggered");

        let shared = Arc::clone(&self.shared);
        let base_url = shared.base_url();
        let generation = shared.generation();
        self.spawn(async move { shared.refresh_datetime(base_url, generation).await });
    }

    /// Refresh the reference time every `period` until the cache is dropped.
    ///
    /// A zero period disables refreshing.
    pub fn spawn_refresh(&self, period: Duration) {
        if period.is_zero() {
            tracing::debug!("periodic reference time refresh disabled");
            return;
        }

        let shared = Arc::clone(&self.shared);

        self.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately; construction already refreshed
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let base_url = shared.base_url();
                let generation = shared.generation();
                shared.refresh_datetime(base_url, generation).await;
            }
        });
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = lock(&self.tasks);

        while let Some(result) = tasks.try_join_next() {
            if let Err(err) = result {
                if err.is_panic() {
                    tracing::error!(error = %err, "fetch task panicked");
                }
            }
        }

        tasks.spawn_on(task, &self.runtime);
    }
}

impl Source for LiveSource {
    fn datetime(&self) -> DateTime {
        *lock(&self.shared.datetime)
    }

    fn airport(&self, icao: &str) -> AirportStatus {
        let generation = {
            let mut cache = lock(&self.shared.cache);
            if let Some(status) = cache.status(icao) {
                return status;
            }

            cache.pending.insert(icao.to_string());
            self.shared.generation()
        };

        let shared = Arc::clone(&self.shared);
        let base_url = shared.base_url();
        let icao = icao.to_string();
        self.spawn(async move { shared.fetch_airport(base_url, icao, generation).await });

        AirportStatus::Pending
    }

    fn sid(&self, icao: &str, point: &str) -> Option<Arc<Sid>> {
        lock(&self.shared.cache).sids.get(icao)?.get(point).cloned()
    }
}

impl Drop for LiveSource {
    fn drop(&mut self) {
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        lock(&self.tasks).abort_all();
        tracing::trace!("source destroyed");
    }
}
