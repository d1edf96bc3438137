//! # Bounded Fetch Retry
//!
//! Wraps a store so that `fetch_crops` survives transient failures.
//!
//! ## Retry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   fetch ──► Ok ─────────────────────────────────────────► return        │
//! │     │                                                                   │
//! │     └─► Err ──► retryable? ──no──────────────────────────► return Err  │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │             attempts left? ──no──────────────────────────► return Err  │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │             sleep(next_backoff) ──► fetch again                         │
//! │                                                                         │
//! │   Create / update / delete pass straight through: a repeated POST      │
//! │   could store the same crop twice.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use harvest_core::{CropPayload, CropRecord};
use tracing::{debug, warn};

use crate::config::RetrySettings;
use crate::error::ClientResult;
use crate::store::CropStore;

/// A store whose fetches are retried with exponential backoff.
#[derive(Debug)]
pub struct Retrying<S> {
    inner: S,
    settings: RetrySettings,
}

impl<S: CropStore> Retrying<S> {
    pub fn new(inner: S, settings: RetrySettings) -> Self {
        Retrying { inner, settings }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Creates the exponential backoff schedule.
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.settings.initial_backoff(),
            max_interval: self.settings.max_backoff(),
            multiplier: 2.0,
            // attempts are bounded by max_retries instead
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl<S: CropStore> CropStore for Retrying<S> {
    async fn fetch_crops(&self) -> ClientResult<Vec<CropRecord>> {
        let mut backoff = self.create_backoff();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let err = match self.inner.fetch_crops().await {
                Ok(records) => {
                    if attempt > 1 {
                        debug!(attempt, "Fetch succeeded after retry");
                    }
                    return Ok(records);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt > self.settings.max_retries {
                warn!(attempt, error = %err, "Fetch failed");
                return Err(err);
            }

            let delay = backoff.next_backoff().unwrap_or(Duration::ZERO);
            warn!(attempt, error = %err, delay_ms = delay.as_millis() as u64, "Fetch failed, retrying");
            tokio::time::sleep(delay).await;
        }
    }

    async fn create_crop(&self, payload: &CropPayload) -> ClientResult<()> {
        self.inner.create_crop(payload).await
    }

    async fn update_crop(&self, id: &str, payload: &CropPayload) -> ClientResult<()> {
        self.inner.update_crop(id, payload).await
    }

    async fn delete_crop(&self, id: &str) -> ClientResult<()> {
        self.inner.delete_crop(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Fails with the scripted errors, then succeeds.
    #[derive(Default)]
    struct FlakyStore {
        failures: Mutex<VecDeque<ClientError>>,
        fetches: AtomicUsize,
        mutations: AtomicUsize,
    }

    impl FlakyStore {
        fn failing_with(errors: Vec<ClientError>) -> Self {
            FlakyStore {
                failures: Mutex::new(errors.into()),
                ..Default::default()
            }
        }
    }

    impl CropStore for FlakyStore {
        async fn fetch_crops(&self) -> ClientResult<Vec<CropRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.failures.lock().await.pop_front() {
                Some(err) => Err(err),
                None => Ok(vec![CropRecord::default().with_id("a")]),
            }
        }

        async fn create_crop(&self, _payload: &CropPayload) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Connection("refused".into()))
        }

        async fn update_crop(&self, _id: &str, _payload: &CropPayload) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Connection("refused".into()))
        }

        async fn delete_crop(&self, _id: &str) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Connection("refused".into()))
        }
    }

    fn settings(max_retries: u32) -> RetrySettings {
        RetrySettings {
            max_retries,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let store = Retrying::new(
            FlakyStore::failing_with(vec![
                ClientError::Connection("refused".into()),
                ClientError::Server { status: 503, message: None },
            ]),
            settings(3),
        );

        let records = store.fetch_crops().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(store.inner().fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let store = Retrying::new(
            FlakyStore::failing_with(vec![ClientError::Timeout(10); 5]),
            settings(2),
        );

        assert_eq!(store.fetch_crops().await, Err(ClientError::Timeout(10)));
        // first attempt plus two retries
        assert_eq!(store.inner().fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failures_are_not_retried() {
        let store = Retrying::new(
            FlakyStore::failing_with(vec![ClientError::Server { status: 400, message: None }]),
            settings(3),
        );

        assert!(store.fetch_crops().await.is_err());
        assert_eq!(store.inner().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_disables_retrying() {
        let store = Retrying::new(
            FlakyStore::failing_with(vec![ClientError::Connection("refused".into())]),
            settings(0),
        );

        assert!(store.fetch_crops().await.is_err());
        assert_eq!(store.inner().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutations_are_never_retried() {
        let store = Retrying::new(FlakyStore::default(), settings(5));

        assert!(store.create_crop(&harvest_core::CropDraft::default().prepare()).await.is_err());
        assert!(store.delete_crop("a").await.is_err());
        assert_eq!(store.inner().mutations.load(Ordering::SeqCst), 2);
    }
}
