//! # Farm Ledger
//!
//! The session state behind the crop table: the last known-good record
//! list, the user actions that change it, and the notifications they raise.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  submit(form, editing_id)                                               │
//! │    │                                                                    │
//! │    ├─► form.submit() ── invalid ──► LedgerError::Validation (no call)   │
//! │    │                                                                    │
//! │    ├─► create_crop / update_crop ── Err ──► toast, list unchanged       │
//! │    │                                                                    │
//! │    └─► refresh() ──► toast "Crop added" / "Crop updated", form reset    │
//! │                                                                         │
//! │  refresh()                                                              │
//! │    ticket = ++latest                                                    │
//! │    records = fetch_crops().await                                        │
//! │    ticket != latest ? ──► Stale (discarded, state untouched)            │
//! │                       └─► replace list, stamp fetched_at                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No optimistic updates: the list only ever changes by a successful,
//! non-stale fetch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use harvest_core::{CropForm, CropMetrics, CropRecord, FilterCriteria};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ClientError, LedgerError, LedgerResult};
use crate::store::CropStore;

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Danger,
}

/// A transient message for the user (the toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notification {
    fn success(title: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            title: title.into(),
            detail: None,
        }
    }

    fn danger(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Danger,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    /// The toast for a failed action, or `None` when the form shows it.
    ///
    /// The service's own message wins; otherwise a generic fallback.
    pub fn failure(action: LedgerAction, err: &LedgerError) -> Option<Self> {
        let client = match err {
            LedgerError::Validation(_) => return None,
            LedgerError::Client(client) => Some(client),
            LedgerError::Core(_) => None,
        };
        let message = client.and_then(|c| c.service_message()).map(str::to_string);

        let (title, fallback) = match action {
            LedgerAction::Fetch => (
                "Failed to load crops from the server.",
                "Something went wrong while loading data. Please try again later.",
            ),
            LedgerAction::Create | LedgerAction::Update => match client {
                Some(ClientError::Rejected(_)) => (
                    "Failed to process crop data.",
                    "The server did not return a success status.",
                ),
                _ => ("Something went wrong", "Please try again later."),
            },
            LedgerAction::Delete => ("Failed to delete crop", "Something went wrong."),
        };

        Some(Notification::danger(title, message.unwrap_or_else(|| fallback.to_string())))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title, detail),
            None => f.write_str(&self.title),
        }
    }
}

/// The user action a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    Fetch,
    Create,
    Update,
    Delete,
}

impl LedgerAction {
    fn success_title(&self) -> &'static str {
        match self {
            LedgerAction::Fetch => "Crops loaded.",
            LedgerAction::Create => "Crop added.",
            LedgerAction::Update => "Crop updated.",
            LedgerAction::Delete => "Crop deleted.",
        }
    }
}

// =============================================================================
// Ledger State
// =============================================================================

/// Result of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was replaced with `count` records.
    Updated { count: usize },

    /// A newer refresh was issued meanwhile; this response was dropped.
    Stale,
}

/// One table row: a record and its derived metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropRow {
    pub record: CropRecord,
    pub metrics: CropMetrics,
}

#[derive(Debug, Default)]
struct LedgerState {
    records: Vec<CropRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Record list plus the actions that change it.
pub struct FarmLedger<S> {
    store: S,
    state: RwLock<LedgerState>,
    latest_ticket: AtomicU64,
    notifications: Mutex<Vec<Notification>>,
}

impl<S: CropStore> FarmLedger<S> {
    pub fn new(store: S) -> Self {
        FarmLedger {
            store,
            state: RwLock::new(LedgerState::default()),
            latest_ticket: AtomicU64::new(0),
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the last known-good list.
    pub async fn records(&self) -> Vec<CropRecord> {
        self.state.read().await.records.clone()
    }

    /// When the current list was fetched; `None` before the first success.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.fetched_at
    }

    /// Filtered rows, in list order, with metrics computed fresh.
    pub async fn rows(&self, criteria: &FilterCriteria) -> Vec<CropRow> {
        let state = self.state.read().await;
        harvest_core::filter(&state.records, criteria)
            .into_iter()
            .map(|record| CropRow {
                record: record.clone(),
                metrics: record.metrics(),
            })
            .collect()
    }

    /// Takes every notification raised since the last call.
    pub async fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().await)
    }

    async fn notify(&self, notification: Notification) {
        self.notifications.lock().await.push(notification);
    }

    async fn notify_failure(&self, action: LedgerAction, err: &LedgerError) {
        if let Some(notification) = Notification::failure(action, err) {
            self.notify(notification).await;
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Re-fetches the list, discarding the response if a newer refresh
    /// was issued while it was in flight.
    pub async fn refresh(&self) -> LedgerResult<FetchOutcome> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "Fetching crops");

        let result = self.store.fetch_crops().await;

        let mut state = self.state.write().await;
        let latest = self.latest_ticket.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(ticket, latest, "Discarding stale fetch response");
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                state.records = records;
                state.fetched_at = Some(Utc::now());
                info!(count, "Crop list refreshed");
                Ok(FetchOutcome::Updated { count })
            }
            Err(err) => {
                drop(state);
                warn!(error = %err, "Crop list refresh failed, keeping previous list");
                let err = LedgerError::from(err);
                self.notify_failure(LedgerAction::Fetch, &err).await;
                Err(err)
            }
        }
    }

    /// Refresh following a successful mutation. The mutation still counts
    /// as done when this fails; the refresh raises its own notification.
    async fn refresh_after(&self, action: LedgerAction) {
        if let Err(err) = self.refresh().await {
            debug!(?action, error = %err, "Refresh after mutation failed");
        }
    }

    /// Validates the form and creates (no id) or updates (`editing_id`)
    /// the crop, then refreshes. The form is reset on success.
    pub async fn submit(
        &self,
        form: &mut CropForm,
        editing_id: Option<&str>,
    ) -> LedgerResult<LedgerAction> {
        let payload = form.submit()?;

        let (action, result) = match editing_id {
            Some(id) => (LedgerAction::Update, self.store.update_crop(id, &payload).await),
            None => (LedgerAction::Create, self.store.create_crop(&payload).await),
        };

        if let Err(err) = result {
            warn!(?action, error = %err, "Crop submission failed");
            let err = LedgerError::from(err);
            self.notify_failure(action, &err).await;
            return Err(err);
        }

        self.refresh_after(action).await;
        form.reset();
        self.notify(Notification::success(action.success_title())).await;
        Ok(action)
    }

    /// Deletes a crop, then refreshes.
    pub async fn delete(&self, id: &str) -> LedgerResult<()> {
        if let Err(err) = self.store.delete_crop(id).await {
            warn!(id, error = %err, "Crop delete failed");
            let err = LedgerError::from(err);
            self.notify_failure(LedgerAction::Delete, &err).await;
            return Err(err);
        }

        self.refresh_after(LedgerAction::Delete).await;
        self.notify(Notification::success(LedgerAction::Delete.success_title())).await;
        Ok(())
    }
}

impl<S> fmt::Debug for FarmLedger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FarmLedger")
            .field("latest_ticket", &self.latest_ticket.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
