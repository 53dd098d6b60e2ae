//! City name to forecast resolution with caching and request de-duplication
//!
//! `ForecastResolver` chains the geocoding and forecast calls for a city and
//! keeps two tables keyed by the normalized (lower-cased) city name:
//!
//! - a cache of successful results, never evicted for the resolver's lifetime
//! - a table of in-flight resolutions, at most one per key
//!
//! Concurrent callers for the same key share one in-flight resolution. The
//! resolution runs on its own task, so a caller that stops waiting does not
//! cancel it for the others. Failures are never cached.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::data::{
    forecast, geocoding, CityQuery, FetchError, ForecastRequest, ForecastResult,
    GeocodingRequest, HttpJsonFetcher,
};

/// Errors surfaced by [`ForecastResolver::resolve`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The query was empty after normalization
    #[error("Please enter a valid city name")]
    Validation,

    /// The geocoder returned no match
    #[error("City \"{query}\" not found. Please check the spelling and try again.")]
    NotFound { query: String },

    /// Transport, status or payload failure at either hop
    #[error("Failed to fetch weather data ({0}). Please try again.")]
    Upstream(#[from] FetchError),
}

impl ResolveError {
    /// Whether retrying the same query may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::Upstream(_))
    }
}

type Resolution = Shared<BoxFuture<'static, Result<Arc<ForecastResult>, ResolveError>>>;

#[derive(Default)]
struct Tables {
    cache: HashMap<String, Arc<ForecastResult>>,
    pending: HashMap<String, Resolution>,
}

struct Inner {
    fetcher: Arc<dyn HttpJsonFetcher>,
    geocoding: GeocodingRequest,
    forecast: ForecastRequest,
    tables: Mutex<Tables>,
}

/// Resolves city names to cached, de-duplicated forecasts
///
/// Cheap to clone; clones share the same cache and in-flight table.
/// `resolve` must be called from within a tokio runtime.
#[derive(Clone)]
pub struct ForecastResolver {
    inner: Arc<Inner>,
}

impl ForecastResolver {
    /// Creates a resolver using the default Open-Meteo endpoints
    pub fn new(fetcher: Arc<dyn HttpJsonFetcher>) -> Self {
        Self::with_requests(fetcher, GeocodingRequest::default(), ForecastRequest::default())
    }

    /// Creates a resolver with custom endpoint settings
    pub fn with_requests(
        fetcher: Arc<dyn HttpJsonFetcher>,
        geocoding: GeocodingRequest,
        forecast: ForecastRequest,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                geocoding,
                forecast,
                tables: Mutex::new(Tables::default()),
            }),
        }
    }

    /// Resolves a free-text city name to its forecast
    ///
    /// Returns the cached result when one exists, joins an in-flight lookup
    /// for the same normalized name when there is one, and otherwise starts
    /// a new geocode + forecast round trip.
    pub async fn resolve(&self, city: &str) -> Result<Arc<ForecastResult>, ResolveError> {
        let query = CityQuery::parse(city)?;

        let (resolution, start) = {
            let mut tables = self.inner.tables.lock();

            if let Some(hit) = tables.cache.get(query.key()) {
                tracing::debug!(key = query.key(), "forecast cache hit");
                return Ok(Arc::clone(hit));
            }

            match tables.pending.get(query.key()) {
                Some(in_flight) => {
                    tracing::debug!(key = query.key(), "joining in-flight lookup");
                    (in_flight.clone(), None)
                }
                None => {
                    let (tx, rx) = oneshot::channel();
                    let resolution = async move {
                        rx.await.unwrap_or_else(|_| {
                            Err(ResolveError::Upstream(FetchError::Aborted(
                                "lookup task ended without a result".to_string(),
                            )))
                        })
                    }
                    .boxed()
                    .shared();
                    tables
                        .pending
                        .insert(query.key().to_string(), resolution.clone());
                    (resolution, Some(tx))
                }
            }
        };

        // Outside the lock: a task dropped inside `spawn` clears its own entry.
        if let Some(tx) = start {
            self.spawn_resolution(query, tx);
        }

        resolution.await
    }

    /// Returns the cached forecast for `city` without any network activity
    pub fn cached(&self, city: &str) -> Option<Arc<ForecastResult>> {
        let query = CityQuery::parse(city).ok()?;
        self.inner.tables.lock().cache.get(query.key()).cloned()
    }

    /// Number of cached forecasts
    pub fn cache_len(&self) -> usize {
        self.inner.tables.lock().cache.len()
    }

    /// Number of lookups currently in flight
    pub fn in_flight(&self) -> usize {
        self.inner.tables.lock().pending.len()
    }

    /// Starts the resolution task for a key already registered as pending.
    /// Must be called without the table lock held.
    fn spawn_resolution(
        &self,
        query: CityQuery,
        tx: oneshot::Sender<Result<Arc<ForecastResult>, ResolveError>>,
    ) {
        tracing::info!(city = query.display(), "starting forecast lookup");

        let entry = PendingEntry {
            inner: Arc::clone(&self.inner),
            key: query.key().to_string(),
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.lookup(&query).await.map(Arc::new);
            match &outcome {
                Ok(forecast) => {
                    tracing::info!(
                        city = query.display(),
                        resolved = %forecast.city_name,
                        days = forecast.days.len(),
                        "forecast lookup finished"
                    );
                    inner
                        .tables
                        .lock()
                        .cache
                        .insert(query.key().to_string(), Arc::clone(forecast));
                }
                Err(err) => {
                    tracing::warn!(city = query.display(), error = %err, "forecast lookup failed");
                }
            }
            // Clear the pending entry before waking waiters so a retry after
            // a failure starts a fresh lookup.
            drop(entry);
            let _ = tx.send(outcome);
        });
    }
}

impl Inner {
    /// Geocode, then fetch the forecast for the first match
    async fn lookup(&self, query: &CityQuery) -> Result<ForecastResult, ResolveError> {
        let geo_url = self.geocoding.url(query.display())?;
        let body = self.fetcher.fetch_json(&geo_url).await?;
        let place = geocoding::parse_first_match(body)?.ok_or_else(|| ResolveError::NotFound {
            query: query.display().to_string(),
        })?;

        tracing::debug!(
            name = %place.name,
            lat = place.latitude,
            lon = place.longitude,
            "geocoded"
        );

        let forecast_url = self.forecast.url(place.latitude, place.longitude)?;
        let body = self.fetcher.fetch_json(&forecast_url).await?;
        Ok(forecast::parse_forecast(body, &place)?)
    }
}

/// Removes the in-flight entry when the resolution task ends, including
/// when it panics or the runtime drops it before its first poll.
struct PendingEntry {
    inner: Arc<Inner>,
    key: String,
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        self.inner.tables.lock().pending.remove(&self.key);
    }
}
