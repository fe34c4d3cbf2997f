//! Short-lived cache for the default booking form id
//!
//! The cache is an injected object rather than process state: callers own an
//! instance, choose its time-to-live and can invalidate it explicitly, for
//! example after a form's default flag changes.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::ports::{Clock, FormRepository, FormRepositoryError};

/// Default time-to-live for a cached lookup.
pub const DEFAULT_TTL_SECS: i64 = 300;

#[derive(Debug, Clone)]
struct CachedLookup {
    form_id: Option<String>,
    fetched_at: DateTime<Utc>,
}

/// Caches the result of [`FormRepository::default_booking_form_id`].
///
/// A lookup that found no default form is cached too.
#[derive(Debug)]
pub struct DefaultFormIdCache<C> {
    clock: C,
    ttl: Duration,
    entry: Mutex<Option<CachedLookup>>,
}

impl<C: Clock> DefaultFormIdCache<C> {
    /// Creates a cache with the default time-to-live.
    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Creates a cache with the given time-to-live.
    pub fn with_ttl(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Returns the cached lookup if it has not expired.
    ///
    /// The outer `None` means there is nothing fresh in the cache.
    #[must_use]
    pub fn peek(&self) -> Option<Option<String>> {
        let now = self.clock.now();
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .filter(|cached| now - cached.fetched_at < self.ttl)
            .map(|cached| cached.form_id.clone())
    }

    /// Returns the default form id, asking the repository when the cache is
    /// empty or expired.
    ///
    /// # Errors
    /// Returns the repository error; failed lookups are not cached.
    pub async fn get_or_fetch<R>(&self, repository: &R) -> Result<Option<String>, FormRepositoryError>
    where
        R: FormRepository + ?Sized,
    {
        if let Some(form_id) = self.peek() {
            return Ok(form_id);
        }

        let form_id = repository.default_booking_form_id().await?;
        debug!(form_id = ?form_id, "refreshed default booking form id");

        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = Some(CachedLookup {
            form_id: form_id.clone(),
            fetched_at: self.clock.now(),
        });
        Ok(form_id)
    }

    /// Drops the cached lookup.
    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = None;
    }
}
