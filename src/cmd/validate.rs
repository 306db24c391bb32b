//! Validate command - surface rows the calculations silently exclude

use crate::cmd::read_entries;
use crate::ledger::LedgerEntry;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// CSV or JSON file containing ledger entries
    #[arg(short, long)]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    entry: usize,
    party: String,
    concept: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let entries = read_entries(&self.file)?;

        let issues: Vec<ValidationIssue> = entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| entry_issues(i + 1, entry))
            .collect();

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS ({})", self.file.display());
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for issue in issues {
                println!(
                    "  {}. [{}] {} - {}",
                    issue.entry, issue.issue_type, issue.concept, issue.message
                );
            }
            println!();
            println!("These entries are excluded from the IVA and IRP aggregations.");
        }
        println!();
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn entry_issues(entry_num: usize, entry: &LedgerEntry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let party = entry.party.clone().unwrap_or_default();
    let concept = entry
        .concept
        .clone()
        .unwrap_or_else(|| "<no concept>".to_string());

    if entry.amount.is_none() {
        issues.push(ValidationIssue {
            issue_type: "NonNumericAmount".to_string(),
            entry: entry_num,
            party: party.clone(),
            concept: concept.clone(),
            message: "amount is not numeric".to_string(),
        });
    }
    if entry.vat_class.is_none() {
        issues.push(ValidationIssue {
            issue_type: "UnknownIvaClass".to_string(),
            entry: entry_num,
            party,
            concept,
            message: "IVA class is not one of 5, 10 or exempt".to_string(),
        });
    }
    issues
}
