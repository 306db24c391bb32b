pub mod entries;
pub mod iva;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::ledger::{self, LedgerEntry, TaxpayerConfig};
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read ledger entries from CSV or JSON based on file extension.
pub fn read_entries(path: &Path) -> anyhow::Result<Vec<LedgerEntry>> {
    let file =
        File::open(path).with_context(|| format!("cannot open ledger {}", path.display()))?;
    let reader = BufReader::new(file);

    let entries = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => ledger::read_json(reader)?,
        // Default to CSV for .csv files and any other extension
        _ => ledger::read_csv(reader)?,
    };
    Ok(entries)
}

/// Load the taxpayer configuration, defaulting when no file is given.
pub fn read_config(path: Option<&Path>) -> anyhow::Result<TaxpayerConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open config {}", path.display()))?;
            Ok(ledger::read_config(BufReader::new(file))?)
        }
        None => Ok(TaxpayerConfig::default()),
    }
}
