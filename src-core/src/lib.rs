//! Hand-history parsing and profit attribution for 6-max no-limit hold'em.
//!
//! Raw text (or zipped text) goes in, one [`HandRecord`] per hand comes out:
//! streets, board, Hero's contribution and profit, rake rebate and the
//! preflop scenario Hero was in.

pub mod contribution;
pub mod extract;
pub mod ingest;
pub mod money;
pub mod parser;
pub mod profit;
pub mod rakeback;
pub mod record;
pub mod scenario;
pub mod storage;
pub mod streets;

use std::path::PathBuf;

use log::info;
use serde::Serialize;

pub use ingest::ImportReport;
pub use parser::{parse_block, parse_hand_text, ParseOptions, ParseOutcome, SkipReason};
pub use record::{HandRecord, Position, PreflopScenario, SeatInfo};
pub use storage::HandStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    #[serde(flatten)]
    pub report: ImportReport,
    pub inserted: usize,
    pub duplicates: usize,
}

/// Parse `paths` and store every hand not already present.
pub fn import_file_paths(store: &HandStore, paths: &[PathBuf]) -> Result<ImportSummary, String> {
    let percentage = store
        .rakeback_percentage()
        .map_err(|e| format!("Failed to read rakeback setting: {}", e))?;
    let (outcome, report) = ingest::parse_paths(paths, &ParseOptions::with_rakeback(percentage));

    let inserted = store
        .insert_hands(&outcome.records)
        .map_err(|e| format!("Failed to store hands: {}", e))?;

    Ok(ImportSummary {
        report,
        inserted,
        duplicates: outcome.records.len() - inserted,
    })
}

/// Live-save path: parse `content` and overwrite any stored copy of each hand.
pub fn save_hand_content(store: &HandStore, content: &str) -> Result<usize, String> {
    let percentage = store
        .rakeback_percentage()
        .map_err(|e| format!("Failed to read rakeback setting: {}", e))?;
    let outcome = parse_hand_text(content, &ParseOptions::with_rakeback(percentage));
    if outcome.records.is_empty() {
        return Err("No valid hands found in content".to_string());
    }

    for record in &outcome.records {
        store
            .replace_hand(record)
            .map_err(|e| format!("Failed to save hand {}: {}", record.hand_id, e))?;
    }
    info!("saved {} hands", outcome.records.len());
    Ok(outcome.records.len())
}

/// Persist a new rakeback percentage and refresh `adjusted_profit` on every
/// stored hand. Contribution and profit stay as stored.
pub fn update_rakeback(store: &HandStore, percentage: f64) -> Result<usize, String> {
    store
        .set_rakeback_percentage(percentage)
        .map_err(|e| format!("Failed to save rakeback setting: {}", e))?;
    store
        .update_adjusted_profit(percentage)
        .map_err(|e| format!("Failed to update adjusted profit: {}", e))
}

/// Bulk recompute at the currently stored percentage. Contribution is rebuilt
/// from the stored street text, which holds no blind or straddle postings.
pub fn recalculate_all(store: &HandStore) -> Result<usize, String> {
    let percentage = store
        .rakeback_percentage()
        .map_err(|e| format!("Failed to read rakeback setting: {}", e))?;
    store
        .recalculate_all(percentage)
        .map_err(|e| format!("Failed to recalculate hands: {}", e))
}
