//! Entries command - per-entry view with the IVA embedded in each amount

use crate::cmd::read_entries;
use crate::ledger::{ExpenseCategory, IncomeKind, LedgerEntry, VatClass};
use crate::money::format_gs;
use crate::tax::iva::{compute_iva, embedded_iva};
use crate::utils::write_csv;
use clap::{Args, ValueEnum};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct EntriesCommand {
    /// CSV or JSON file containing ledger entries
    #[arg(short, long)]
    file: PathBuf,

    /// Filter by IVA class
    #[arg(short = 'c', long, value_enum)]
    class: Option<VatClassFilter>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VatClassFilter {
    Five,
    Ten,
    Exempt,
}

impl VatClassFilter {
    fn matches(&self, class: Option<VatClass>) -> bool {
        matches!(
            (*self, class),
            (VatClassFilter::Five, Some(VatClass::Five))
                | (VatClassFilter::Ten, Some(VatClass::Ten))
                | (VatClassFilter::Exempt, Some(VatClass::Exempt))
        )
    }
}

/// Row for the entries table output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct EntryRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    pub row_num: String,

    #[tabled(rename = "Date")]
    pub date: String,

    #[tabled(rename = "Party")]
    pub party: String,

    #[tabled(rename = "Concept")]
    pub concept: String,

    #[tabled(rename = "Amount")]
    pub amount: String,

    #[tabled(rename = "IVA Class")]
    pub vat_class: String,

    #[tabled(rename = "IVA")]
    pub iva: String,

    #[tabled(rename = "Tags")]
    pub tags: String,
}

impl EntriesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let entries: Vec<LedgerEntry> = read_entries(&self.file)?
            .into_iter()
            .filter(|e| self.class.is_none_or(|f| f.matches(e.vat_class)))
            .collect();

        let rows: Vec<EntryRow> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| build_row(i + 1, entry))
            .collect();

        if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            self.print_table(&rows, &entries);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[EntryRow], entries: &[LedgerEntry]) {
        if rows.is_empty() {
            println!("No entries found matching filters");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let summary = compute_iva(entries);
        let total: rust_decimal::Decimal = entries.iter().filter_map(|e| e.amount).sum();
        println!(
            "Total: {} | Total IVA: {}",
            format_gs(total),
            format_gs(summary.vat_total)
        );
    }
}

fn build_row(row_num: usize, entry: &LedgerEntry) -> EntryRow {
    let iva = match (entry.amount, entry.vat_class) {
        (Some(amount), Some(class)) => format_gs(embedded_iva(amount, class)),
        _ => "-".to_string(),
    };

    let mut tags = Vec::new();
    match entry.kind {
        Some(IncomeKind::Services) => tags.push("services"),
        Some(IncomeKind::Other) => tags.push("other"),
        None => {}
    }
    match entry.category {
        Some(ExpenseCategory::Business) => tags.push("business"),
        Some(ExpenseCategory::Family) => tags.push("family"),
        None => {}
    }

    EntryRow {
        row_num: format!("#{}", row_num),
        date: entry
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        party: entry.party.clone().unwrap_or_default(),
        concept: entry.concept.clone().unwrap_or_default(),
        amount: entry.amount.map(format_gs).unwrap_or_else(|| "?".to_string()),
        vat_class: entry
            .vat_class
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string()),
        iva,
        tags: tags.join(", "),
    }
}
