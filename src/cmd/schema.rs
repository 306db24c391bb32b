//! Schema command - print expected input formats

use crate::ledger::{LedgerFile, TaxpayerConfig};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// Print the taxpayer configuration schema instead of the ledger schema
    #[arg(long)]
    config: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the input format
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = if self.config {
            schema_for!(TaxpayerConfig)
        } else {
            schema_for!(LedgerFile)
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", CSV_COLUMNS.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Input Format");
        println!("================");
        println!();
        for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
            let req = if *required { "required" } else { "optional" };
            println!("{:16} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Amounts are VAT-inclusive gross figures in whole guaraníes.");
        println!("The legacy split columns replace amount/vat_class for old expense exports.");
        Ok(())
    }
}

const CSV_COLUMNS: &[&str] = &[
    "date",
    "party",
    "concept",
    "amount",
    "vat_class",
    "kind",
    "category",
    "exempt_amount",
    "net_5",
    "vat_5",
    "net_10",
    "vat_10",
];

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("date", false, "Entry date, YYYY-MM-DD"),
    ("party", false, "Client (income) or supplier (expense)"),
    ("concept", false, "Free-text description"),
    ("amount", true, "VAT-inclusive gross amount"),
    ("vat_class", true, "IVA class: 5, 10 or exempt"),
    ("kind", false, "Income kind: services or other"),
    ("category", false, "Expense category: business or family"),
    ("exempt_amount", false, "Legacy split: exempt gross amount"),
    ("net_5", false, "Legacy split: net amount at 5%"),
    ("vat_5", false, "Legacy split: IVA amount at 5%"),
    ("net_10", false, "Legacy split: net amount at 10%"),
    ("vat_10", false, "Legacy split: IVA amount at 10%"),
];
