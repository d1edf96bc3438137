//! # harvest-client: Crop Service Client for Harvest Ledger
//!
//! Talks to the crop CRUD service and keeps the session's record list.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    FarmLedger<S: CropStore>                      │  │
//! │  │                                                                  │  │
//! │  │  Last known-good list • stale-fetch guard • notifications        │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                Retrying<S>  (fetch only, bounded)                │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │             ┌─────────────────┴──────────────────┐                      │
//! │             ▼                                    ▼                      │
//! │  ┌────────────────────┐               ┌────────────────────┐            │
//! │  │  HttpCropStore     │               │ InMemoryCropStore  │            │
//! │  │  reqwest + JSON    │               │ tests / --offline  │            │
//! │  └────────────────────┘               └────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use harvest_client::{ClientConfig, FarmLedger, HttpCropStore, Retrying};
//! use harvest_core::FilterCriteria;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load(None)?;
//! let store = Retrying::new(HttpCropStore::new(&config)?, config.retry.clone());
//! let ledger = FarmLedger::new(store);
//!
//! ledger.refresh().await?;
//! for row in ledger.rows(&FilterCriteria::default()).await {
//!     println!("{} {}", row.record.crop.name, row.metrics.profit);
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod retry;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, ClientConfig, RetrySettings};
pub use error::{ClientError, ClientResult, LedgerError, LedgerResult};
pub use ledger::{CropRow, FarmLedger, FetchOutcome, LedgerAction, Notification, NotificationLevel};
pub use memory::InMemoryCropStore;
pub use retry::Retrying;
pub use store::{CropStore, HttpCropStore};
