//! Subcommand handlers.
//!
//! Each handler runs one ledger action and prints what the user would see:
//! the table, field errors, and the notifications the action raised.

use std::path::Path;

use anyhow::{bail, Context};
use harvest_client::{CropStore, FarmLedger, LedgerError, NotificationLevel};
use harvest_core::{CropDraft, CropForm, FilterCriteria};
use tracing::debug;

use crate::table;

/// Refreshes and prints the filtered table.
pub async fn list<S: CropStore>(
    ledger: &FarmLedger<S>,
    criteria: &FilterCriteria,
    json: bool,
) -> anyhow::Result<()> {
    let refreshed = ledger.refresh().await;
    print_notifications(ledger).await;
    refreshed?;

    let rows = ledger.rows(criteria).await;
    debug!(shown = rows.len(), active = criteria.is_active(), "Rendering crops");

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", table::render(&rows));
    }
    Ok(())
}

/// Creates (`editing_id == None`) or updates a crop from a JSON draft file.
pub async fn submit<S: CropStore>(
    ledger: &FarmLedger<S>,
    file: &Path,
    editing_id: Option<&str>,
) -> anyhow::Result<()> {
    let mut form = CropForm::from_draft(read_draft(file)?);

    let result = ledger.submit(&mut form, editing_id).await;
    print_notifications(ledger).await;

    match result {
        Ok(_) => Ok(()),
        Err(LedgerError::Validation(errors)) => {
            eprint!("Crop not saved:\n{}", table::render_field_errors(&errors));
            bail!("{} invalid field(s)", errors.len())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete<S: CropStore>(ledger: &FarmLedger<S>, id: &str) -> anyhow::Result<()> {
    let result = ledger.delete(id).await;
    print_notifications(ledger).await;
    Ok(result?)
}

/// Reads a crop draft; numbers may be given as JSON numbers or strings.
fn read_draft(file: &Path) -> anyhow::Result<CropDraft> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read draft file {}", file.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Draft file {} is not a crop draft", file.display()))
}

async fn print_notifications<S: CropStore>(ledger: &FarmLedger<S>) {
    for notification in ledger.drain_notifications().await {
        match notification.level {
            NotificationLevel::Success => eprintln!("✓ {notification}"),
            NotificationLevel::Danger => eprintln!("✗ {notification}"),
        }
    }
}
