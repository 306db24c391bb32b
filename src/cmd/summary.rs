//! Summary command - full IRP and IVA report from income and expense ledgers

use crate::cmd::{read_config, read_entries};
use crate::ledger::{ledger_stats, LedgerStats, TaxpayerConfig};
use crate::money::{format_gs, round_gs};
use crate::tax::irp::{
    compute_irp, IrpSummary, DEPENDENT_DEDUCTION, PERSONAL_EXPENSE_CAP, REGISTRATION_THRESHOLD,
};
use crate::tax::iva::IvaSummary;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// CSV or JSON file containing income entries
    #[arg(short, long)]
    income: PathBuf,

    /// CSV or JSON file containing expense entries
    #[arg(short, long)]
    expenses: Option<PathBuf>,

    /// JSON file with the taxpayer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    income: SideData,
    expenses: SideData,
    irp: IrpData,
    iva_due: String,
    total_due: String,
    must_register: bool,
}

#[derive(Debug, Serialize)]
struct SideData {
    total: String,
    entry_count: usize,
    average: String,
    iva_at_five: String,
    iva_at_ten: String,
    exempt_total: String,
    iva_total: String,
}

#[derive(Debug, Serialize)]
struct IrpData {
    service_income: String,
    deductible_expenses: String,
    dependent_deduction: String,
    personal_deduction: String,
    taxable_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate: Option<String>,
    irp_due: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let income = read_entries(&self.income)?;
        let expenses = match &self.expenses {
            Some(path) => read_entries(path)?,
            None => Vec::new(),
        };
        let config = read_config(self.config.as_deref())?;

        let summary = compute_irp(&income, &expenses, &config);
        let income_stats = ledger_stats(&income);
        let expense_stats = ledger_stats(&expenses);

        if self.json {
            self.print_json(&summary, &income_stats, &expense_stats)
        } else {
            self.print_summary(&summary, &income_stats, &expense_stats, &config);
            Ok(())
        }
    }

    fn print_summary(
        &self,
        summary: &IrpSummary,
        income_stats: &LedgerStats,
        expense_stats: &LedgerStats,
        config: &TaxpayerConfig,
    ) {
        println!();
        println!("IRP / IVA SUMMARY");
        println!();

        println!("INCOME");
        print_side(income_stats, &summary.income_iva);
        println!();

        println!("EXPENSES");
        print_side(expense_stats, &summary.expense_iva);
        println!();

        println!("IRP");
        println!(
            "  Service income (net of IVA): {}",
            format_gs(summary.service_income)
        );
        println!(
            "  Deductible expenses: {}",
            format_gs(summary.deductible_expenses)
        );
        println!(
            "  Dependent deduction ({} x {}): {}",
            config.dependents.max(0),
            format_gs(DEPENDENT_DEDUCTION),
            format_gs(summary.dependent_deduction)
        );
        println!(
            "  Personal deduction (cap {}): {}",
            format_gs(PERSONAL_EXPENSE_CAP),
            format_gs(summary.personal_deduction)
        );
        println!("  Taxable base: {}", format_gs(summary.taxable_base));
        match summary.bracket {
            Some(bracket) => println!(
                "  IRP @ {}: {}",
                bracket,
                format_gs(summary.irp_due)
            ),
            None => println!("  IRP: {} (no taxable base)", format_gs(summary.irp_due)),
        }
        println!();

        println!("IVA DUE: {}", format_gs(summary.iva_due));
        println!(
            "TOTAL DUE: {}",
            format_gs(summary.irp_due + summary.iva_due)
        );

        if summary.must_register {
            println!();
            println!(
                "\u{26A0} Net service income exceeds {} - IRP registration required",
                format_gs(REGISTRATION_THRESHOLD)
            );
        }
        println!();
    }

    fn print_json(
        &self,
        summary: &IrpSummary,
        income_stats: &LedgerStats,
        expense_stats: &LedgerStats,
    ) -> anyhow::Result<()> {
        let data = SummaryData {
            income: side_data(income_stats, &summary.income_iva),
            expenses: side_data(expense_stats, &summary.expense_iva),
            irp: IrpData {
                service_income: round_gs(summary.service_income).to_string(),
                deductible_expenses: round_gs(summary.deductible_expenses).to_string(),
                dependent_deduction: summary.dependent_deduction.to_string(),
                personal_deduction: summary.personal_deduction.to_string(),
                taxable_base: round_gs(summary.taxable_base).to_string(),
                rate: summary.bracket.map(|b| b.label().to_string()),
                irp_due: round_gs(summary.irp_due).to_string(),
            },
            iva_due: summary.iva_due.to_string(),
            total_due: round_gs(summary.irp_due + summary.iva_due).to_string(),
            must_register: summary.must_register,
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

fn print_side(stats: &LedgerStats, iva: &IvaSummary) {
    println!(
        "  Total: {} ({} entries, avg {})",
        format_gs(stats.total),
        stats.count,
        format_gs(stats.average)
    );
    println!(
        "  IVA 5%: {} | IVA 10%: {} | Exempt: {} | Total IVA: {}",
        format_gs(iva.vat_at_five),
        format_gs(iva.vat_at_ten),
        format_gs(iva.exempt_total),
        format_gs(iva.vat_total)
    );
}

fn side_data(stats: &LedgerStats, iva: &IvaSummary) -> SideData {
    SideData {
        total: round_gs(stats.total).to_string(),
        entry_count: stats.count,
        average: round_gs(stats.average).to_string(),
        iva_at_five: iva.vat_at_five.to_string(),
        iva_at_ten: iva.vat_at_ten.to_string(),
        exempt_total: round_gs(iva.exempt_total).to_string(),
        iva_total: iva.vat_total.to_string(),
    }
}
