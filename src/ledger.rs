//! Ledger data model and input readers.
//!
//! Income and expense ledgers arrive as CSV or JSON files. Rows keep the
//! fail-soft contract of the tax engine: a non-numeric amount or an unknown
//! IVA class leaves the field as `None` instead of failing the whole read, so
//! the engine can skip the row and `validate` can report it.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV ledger: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON ledger: {0}")]
    Json(#[from] serde_json::Error),
}

/// IVA rate class of a VAT-inclusive gross amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VatClass {
    Five,
    Ten,
    Exempt,
}

impl VatClass {
    /// Accepts both the current tags and the Spanish tags of older ledgers.
    pub fn from_str(s: &str) -> Option<VatClass> {
        match s.trim().to_lowercase().as_str() {
            "5" | "five" => Some(VatClass::Five),
            "10" | "ten" => Some(VatClass::Ten),
            "exempt" | "exenta" => Some(VatClass::Exempt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VatClass::Five => "5",
            VatClass::Ten => "10",
            VatClass::Exempt => "exempt",
        }
    }
}

impl fmt::Display for VatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income classification; only service income enters the IRP base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeKind {
    Services,
    Other,
}

impl IncomeKind {
    pub fn from_str(s: &str) -> Option<IncomeKind> {
        match s.trim().to_lowercase().as_str() {
            "services" | "servicios" => Some(IncomeKind::Services),
            "other" | "otros" => Some(IncomeKind::Other),
            _ => None,
        }
    }
}

/// Expense classification; only business expenses are deductible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Business,
    Family,
}

impl ExpenseCategory {
    pub fn from_str(s: &str) -> Option<ExpenseCategory> {
        match s.trim().to_lowercase().as_str() {
            "business" | "gastos" => Some(ExpenseCategory::Business),
            "family" | "familiares" => Some(ExpenseCategory::Family),
            _ => None,
        }
    }
}

/// A single ledger entry as seen by the tax engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub date: Option<NaiveDate>,
    pub party: Option<String>,
    pub concept: Option<String>,
    /// `None` when the source value was not numeric.
    pub amount: Option<Decimal>,
    /// `None` when the source tag was missing or unrecognized.
    pub vat_class: Option<VatClass>,
    pub kind: Option<IncomeKind>,
    pub category: Option<ExpenseCategory>,
}

impl LedgerEntry {
    /// Whether the entry carries everything the IVA aggregation needs.
    pub fn is_computable(&self) -> bool {
        self.amount.is_some() && self.vat_class.is_some()
    }
}

/// JSON ledger file shape: `{"entries": [...]}`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LedgerFile {
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

/// Raw input row, shared by income and expense ledgers.
///
/// Two shapes are supported: the current one (`amount` + `vat_class`) and the
/// legacy split-amount expense shape where each IVA rate has its own
/// net/vat column pair. A split row normalizes into one entry per non-empty
/// bucket before it reaches the engine.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntryRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Client (income) or supplier (expense).
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
    /// VAT-inclusive gross amount.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub amount: Option<Decimal>,
    /// IVA class: 5, 10 or exempt.
    #[serde(default)]
    pub vat_class: Option<String>,
    /// Income kind: services or other.
    #[serde(default)]
    pub kind: Option<String>,
    /// Expense category: business or family.
    #[serde(default)]
    pub category: Option<String>,
    /// Legacy split format: exempt gross amount.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub exempt_amount: Option<Decimal>,
    /// Legacy split format: net amount at 5%.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub net_5: Option<Decimal>,
    /// Legacy split format: IVA amount at 5%.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub vat_5: Option<Decimal>,
    /// Legacy split format: net amount at 10%.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub net_10: Option<Decimal>,
    /// Legacy split format: IVA amount at 10%.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<String>")]
    pub vat_10: Option<Decimal>,
}

impl EntryRecord {
    fn is_split(&self) -> bool {
        self.exempt_amount.is_some()
            || self.net_5.is_some()
            || self.vat_5.is_some()
            || self.net_10.is_some()
            || self.vat_10.is_some()
    }

    /// Normalize into engine entries, one per VAT bucket for split rows.
    pub fn into_entries(self) -> Vec<LedgerEntry> {
        let kind = self.kind.as_deref().and_then(|s| {
            let kind = IncomeKind::from_str(s);
            if kind.is_none() {
                warn!("unknown income kind '{}', entry will not count as services", s);
            }
            kind
        });
        let category = self.category.as_deref().and_then(|s| {
            let category = ExpenseCategory::from_str(s);
            if category.is_none() {
                warn!("unknown expense category '{}', entry will not be deductible", s);
            }
            category
        });

        if self.is_split() {
            let buckets = [
                (VatClass::Exempt, self.exempt_amount.unwrap_or(Decimal::ZERO)),
                (
                    VatClass::Five,
                    self.net_5.unwrap_or(Decimal::ZERO) + self.vat_5.unwrap_or(Decimal::ZERO),
                ),
                (
                    VatClass::Ten,
                    self.net_10.unwrap_or(Decimal::ZERO) + self.vat_10.unwrap_or(Decimal::ZERO),
                ),
            ];
            return buckets
                .into_iter()
                .filter(|(_, gross)| *gross > Decimal::ZERO)
                .map(|(class, gross)| LedgerEntry {
                    date: self.date,
                    party: self.party.clone(),
                    concept: self.concept.clone(),
                    amount: Some(gross),
                    vat_class: Some(class),
                    kind,
                    category,
                })
                .collect();
        }

        let vat_class = self.vat_class.as_deref().and_then(|s| {
            let class = VatClass::from_str(s);
            if class.is_none() {
                warn!("unknown IVA class '{}', entry excluded from aggregation", s);
            }
            class
        });
        if self.amount.is_none() {
            warn!(
                "non-numeric amount for '{}', entry excluded from aggregation",
                self.concept.as_deref().unwrap_or("<no concept>")
            );
        }

        vec![LedgerEntry {
            date: self.date,
            party: self.party,
            concept: self.concept,
            amount: self.amount,
            vat_class,
            kind,
            category,
        }]
    }
}

/// Accept a number or a numeric string; anything else becomes `None`.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> serde::de::Visitor<'de> for AmountVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Decimal::from_str(v.trim()).ok())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Decimal::try_from(v).ok())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(AmountVisitor)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// Taxpayer configuration; absent or negative fields fall back to zero.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TaxpayerConfig {
    pub taxpayer_type: TaxpayerType,
    /// Dependent family members.
    pub dependents: i64,
    /// Annual personal expenses, capped before deduction.
    #[schemars(with = "String")]
    pub personal_expenses: Decimal,
}

impl Default for TaxpayerConfig {
    fn default() -> Self {
        TaxpayerConfig {
            taxpayer_type: TaxpayerType::ServicesOnly,
            dependents: 0,
            personal_expenses: Decimal::ZERO,
        }
    }
}

/// Carried through for reporting; the bracket formula does not use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaxpayerType {
    ServicesOnly,
    Mixed,
}

/// Read ledger entries from CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LedgerEntry>, LedgerError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for record in rdr.deserialize::<EntryRecord>() {
        entries.extend(record?.into_entries());
    }
    Ok(entries)
}

/// Read ledger entries from JSON (`{"entries": [...]}`).
pub fn read_json<R: Read>(reader: R) -> Result<Vec<LedgerEntry>, LedgerError> {
    let file: LedgerFile = serde_json::from_reader(reader)?;
    Ok(file
        .entries
        .into_iter()
        .flat_map(EntryRecord::into_entries)
        .collect())
}

/// Read a taxpayer configuration from JSON.
pub fn read_config<R: Read>(reader: R) -> Result<TaxpayerConfig, LedgerError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Display-level totals over one entry list.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStats {
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

pub fn ledger_stats(entries: &[LedgerEntry]) -> LedgerStats {
    let total: Decimal = entries.iter().filter_map(|e| e.amount).sum();
    let count = entries.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count as u64)
    };
    LedgerStats {
        total,
        count,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_csv_income_ledger() {
        let csv_data = "\
date,party,concept,amount,vat_class,kind
2024-03-05,ACME SA,Consulting March,11000000,10,services
2024-04-02,ACME SA,Consulting April,5250000,5,services
2024-05-10,Dividends,Dividend payout,3000000,exempt,other";

        let entries = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].amount, Some(dec!(11000000)));
        assert_eq!(entries[0].vat_class, Some(VatClass::Ten));
        assert_eq!(entries[0].kind, Some(IncomeKind::Services));
        assert_eq!(entries[2].vat_class, Some(VatClass::Exempt));
        assert_eq!(entries[2].kind, Some(IncomeKind::Other));
    }

    #[test]
    fn bad_amount_and_class_kept_as_none() {
        let csv_data = "\
date,party,concept,amount,vat_class,kind
2024-03-05,ACME SA,Typo row,abc,10,services
2024-03-06,ACME SA,Bad class,1000000,12,services";

        let entries = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, None);
        assert_eq!(entries[0].vat_class, Some(VatClass::Ten));
        assert!(!entries[0].is_computable());
        assert_eq!(entries[1].amount, Some(dec!(1000000)));
        assert_eq!(entries[1].vat_class, None);
        assert!(!entries[1].is_computable());
    }

    #[test]
    fn legacy_spanish_tags_accepted() {
        let csv_data = "\
date,party,concept,amount,vat_class,kind,category
2024-03-05,Farmacia,Remedios,220000,exenta,,familiares
2024-03-06,Libreria,Utiles,110000,10,,gastos";

        let entries = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(entries[0].vat_class, Some(VatClass::Exempt));
        assert_eq!(entries[0].category, Some(ExpenseCategory::Family));
        assert_eq!(entries[1].category, Some(ExpenseCategory::Business));
    }

    #[test]
    fn split_expense_row_normalizes_per_bucket() {
        let record = EntryRecord {
            date: None,
            party: Some("Supermercado".to_string()),
            concept: Some("Compra mensual".to_string()),
            amount: None,
            vat_class: None,
            kind: None,
            category: Some("business".to_string()),
            exempt_amount: Some(dec!(50000)),
            net_5: Some(dec!(100000)),
            vat_5: Some(dec!(5000)),
            net_10: Some(dec!(200000)),
            vat_10: Some(dec!(20000)),
        };

        let entries = record.into_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].vat_class, Some(VatClass::Exempt));
        assert_eq!(entries[0].amount, Some(dec!(50000)));
        assert_eq!(entries[1].vat_class, Some(VatClass::Five));
        assert_eq!(entries[1].amount, Some(dec!(105000)));
        assert_eq!(entries[2].vat_class, Some(VatClass::Ten));
        assert_eq!(entries[2].amount, Some(dec!(220000)));
        assert!(entries.iter().all(|e| e.category == Some(ExpenseCategory::Business)));
    }

    #[test]
    fn split_row_skips_empty_buckets() {
        let record = EntryRecord {
            date: None,
            party: None,
            concept: None,
            amount: None,
            vat_class: None,
            kind: None,
            category: Some("business".to_string()),
            exempt_amount: None,
            net_5: None,
            vat_5: None,
            net_10: Some(dec!(90909)),
            vat_10: Some(dec!(9091)),
        };

        let entries = record.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].vat_class, Some(VatClass::Ten));
        assert_eq!(entries[0].amount, Some(dec!(100000)));
    }

    #[test]
    fn parse_json_ledger() {
        let json_data = r#"{
            "entries": [
                {
                    "date": "2024-03-05",
                    "party": "ACME SA",
                    "concept": "Consulting",
                    "amount": 11000000,
                    "vat_class": "10",
                    "kind": "services"
                },
                {
                    "concept": "String amount",
                    "amount": "5250000",
                    "vat_class": "5",
                    "kind": "other"
                }
            ]
        }"#;

        let entries = read_json(json_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, Some(dec!(11000000)));
        assert_eq!(entries[1].amount, Some(dec!(5250000)));
        assert_eq!(entries[1].vat_class, Some(VatClass::Five));
    }

    #[test]
    fn config_defaults_when_fields_missing() {
        let config = read_config("{}".as_bytes()).unwrap();
        assert_eq!(config, TaxpayerConfig::default());

        let config = read_config(
            r#"{"taxpayer_type": "mixed", "dependents": 3, "personal_expenses": 9000000}"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(config.taxpayer_type, TaxpayerType::Mixed);
        assert_eq!(config.dependents, 3);
        assert_eq!(config.personal_expenses, dec!(9000000));
    }

    #[test]
    fn stats_over_mixed_rows() {
        let csv_data = "\
date,party,concept,amount,vat_class,kind
2024-03-05,A,One,1000,10,services
2024-03-06,B,Two,2000,5,services
2024-03-07,C,Bad,abc,10,services";

        let entries = read_csv(csv_data.as_bytes()).unwrap();
        let stats = ledger_stats(&entries);
        assert_eq!(stats.total, dec!(3000));
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, dec!(1000));
    }

    #[test]
    fn stats_empty_ledger() {
        let stats = ledger_stats(&[]);
        assert_eq!(stats.total, Decimal::ZERO);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, Decimal::ZERO);
    }
}
