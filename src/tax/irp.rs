//! IRP calculation for individual service providers.
//!
//! The bracket scale applies its flat rate to the whole taxable base once a
//! threshold is crossed, not just to the slice above it. That is how this
//! simplified regime works; it is not a marginal scale.

use crate::ledger::{ExpenseCategory, IncomeKind, LedgerEntry, TaxpayerConfig, VatClass};
use crate::tax::iva::{compute_iva, IvaSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// Annual deduction per dependent family member.
pub const DEPENDENT_DEDUCTION: Decimal = dec!(12_000_000);
/// Ceiling on the personal-expense deduction.
pub const PERSONAL_EXPENSE_CAP: Decimal = dec!(15_000_000);
/// Net service income above which IRP registration is mandatory.
pub const REGISTRATION_THRESHOLD: Decimal = dec!(80_000_000);

/// IRP bracket applied to the full taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrpBracket {
    Eight,
    Nine,
    Ten,
}

impl IrpBracket {
    /// Bracket for a taxable base; `None` when there is nothing to tax.
    pub fn for_base(base: Decimal) -> Option<IrpBracket> {
        if base > dec!(36_000_000) {
            Some(IrpBracket::Ten)
        } else if base > dec!(24_000_000) {
            Some(IrpBracket::Nine)
        } else if base > Decimal::ZERO {
            Some(IrpBracket::Eight)
        } else {
            None
        }
    }

    pub fn rate(&self) -> Decimal {
        match self {
            IrpBracket::Eight => dec!(0.08),
            IrpBracket::Nine => dec!(0.09),
            IrpBracket::Ten => dec!(0.10),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IrpBracket::Eight => "8%",
            IrpBracket::Nine => "9%",
            IrpBracket::Ten => "10%",
        }
    }
}

impl fmt::Display for IrpBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Full IRP report for one fiscal year of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct IrpSummary {
    /// All income amounts, regardless of kind or IVA class.
    pub gross_income: Decimal,
    /// All expense amounts, regardless of category or IVA class.
    pub gross_expenses: Decimal,
    /// Service income net of IVA.
    pub service_income: Decimal,
    /// Business expenses net of IVA.
    pub deductible_expenses: Decimal,
    pub dependent_deduction: Decimal,
    /// Personal expenses after the cap.
    pub personal_deduction: Decimal,
    /// Floored at zero.
    pub taxable_base: Decimal,
    pub irp_due: Decimal,
    /// Income IVA less expense IVA, floored at zero.
    pub iva_due: Decimal,
    pub must_register: bool,
    pub bracket: Option<IrpBracket>,
    pub income_iva: IvaSummary,
    pub expense_iva: IvaSummary,
}

/// Net amount of a VAT-inclusive gross, backing the IVA out by division.
///
/// This is the `A / (1 + r/100)` form, kept separate from the aggregator's
/// `A * r / (100 + r)` form: the two can differ by a guaraní after rounding,
/// and the IRP base must use the division form.
fn net_of_iva(amount: Decimal, class: VatClass) -> Decimal {
    match class {
        VatClass::Exempt => amount,
        VatClass::Five => amount / dec!(1.05),
        VatClass::Ten => amount / dec!(1.1),
    }
}

/// Compute the IRP obligation from income entries, expense entries and the
/// taxpayer configuration.
///
/// Pure over its inputs; malformed entries are excluded row by row and
/// negative configuration values clamp to zero, so this never fails.
pub fn compute_irp(
    income: &[LedgerEntry],
    expenses: &[LedgerEntry],
    config: &TaxpayerConfig,
) -> IrpSummary {
    let income_iva = compute_iva(income);
    let expense_iva = compute_iva(expenses);

    let gross_income: Decimal = income.iter().filter_map(|e| e.amount).sum();
    let gross_expenses: Decimal = expenses.iter().filter_map(|e| e.amount).sum();

    let service_income: Decimal = income
        .iter()
        .filter(|e| e.kind == Some(IncomeKind::Services))
        .filter_map(|e| Some(net_of_iva(e.amount?, e.vat_class?)))
        .sum();

    let deductible_expenses: Decimal = expenses
        .iter()
        .filter(|e| e.category == Some(ExpenseCategory::Business))
        .filter_map(|e| Some(net_of_iva(e.amount?, e.vat_class?)))
        .sum();

    let dependent_deduction = Decimal::from(config.dependents.max(0)) * DEPENDENT_DEDUCTION;
    let personal_deduction = config
        .personal_expenses
        .max(Decimal::ZERO)
        .min(PERSONAL_EXPENSE_CAP);

    let taxable_base = (service_income
        - deductible_expenses
        - dependent_deduction
        - personal_deduction)
        .max(Decimal::ZERO);

    let bracket = IrpBracket::for_base(taxable_base);
    let irp_due = bracket.map_or(Decimal::ZERO, |b| taxable_base * b.rate());

    let iva_due = (income_iva.vat_total - expense_iva.vat_total).max(Decimal::ZERO);
    let must_register = service_income > REGISTRATION_THRESHOLD;

    IrpSummary {
        gross_income,
        gross_expenses,
        service_income,
        deductible_expenses,
        dependent_deduction,
        personal_deduction,
        taxable_base,
        irp_due,
        iva_due,
        must_register,
        bracket,
        income_iva,
        expense_iva,
    }
}
