//! Iva command - VAT breakdown for a single ledger file

use crate::cmd::read_entries;
use crate::money::{format_gs, round_gs};
use crate::tax::iva::compute_iva;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct IvaCommand {
    /// CSV or JSON file containing ledger entries
    #[arg(short, long)]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct IvaData {
    iva_at_five: String,
    iva_at_ten: String,
    exempt_total: String,
    iva_total: String,
}

impl IvaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let entries = read_entries(&self.file)?;
        let summary = compute_iva(&entries);

        if self.json {
            let data = IvaData {
                iva_at_five: summary.vat_at_five.to_string(),
                iva_at_ten: summary.vat_at_ten.to_string(),
                exempt_total: round_gs(summary.exempt_total).to_string(),
                iva_total: summary.vat_total.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            println!();
            println!("IVA SUMMARY ({})", self.file.display());
            println!();
            println!("  IVA 5%: {}", format_gs(summary.vat_at_five));
            println!("  IVA 10%: {}", format_gs(summary.vat_at_ten));
            println!("  Exempt: {}", format_gs(summary.exempt_total));
            println!();
            println!("  TOTAL IVA: {}", format_gs(summary.vat_total));
            println!();
        }
        Ok(())
    }
}
