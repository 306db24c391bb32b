//! IVA aggregation over VAT-inclusive ledger entries.

use crate::ledger::{LedgerEntry, VatClass};
use crate::money::round_gs;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Aggregated IVA components of one entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvaSummary {
    /// Embedded IVA of the 5% class, rounded to whole guaraníes.
    pub vat_at_five: Decimal,
    /// Embedded IVA of the 10% class, rounded to whole guaraníes.
    pub vat_at_ten: Decimal,
    /// Exempt gross amounts, unrounded.
    pub exempt_total: Decimal,
    /// Sum of the two already-rounded per-rate buckets.
    pub vat_total: Decimal,
}

/// IVA embedded in a VAT-inclusive gross amount: `A * r / (100 + r)`.
pub fn embedded_iva(amount: Decimal, class: VatClass) -> Decimal {
    match class {
        VatClass::Five => amount * dec!(5) / dec!(105),
        VatClass::Ten => amount * dec!(10) / dec!(110),
        VatClass::Exempt => Decimal::ZERO,
    }
}

/// Aggregate the IVA embedded in a list of entries.
///
/// Entries without a numeric amount or a recognized IVA class are skipped.
/// Each rate bucket is rounded on its own before the buckets are summed, so
/// `vat_at_five + vat_at_ten == vat_total` holds exactly.
pub fn compute_iva(entries: &[LedgerEntry]) -> IvaSummary {
    let mut five = Decimal::ZERO;
    let mut ten = Decimal::ZERO;
    let mut exempt = Decimal::ZERO;

    for entry in entries {
        let (amount, class) = match (entry.amount, entry.vat_class) {
            (Some(amount), Some(class)) => (amount, class),
            _ => continue,
        };
        match class {
            VatClass::Five => five += embedded_iva(amount, class),
            VatClass::Ten => ten += embedded_iva(amount, class),
            VatClass::Exempt => exempt += amount,
        }
    }

    let vat_at_five = round_gs(five);
    let vat_at_ten = round_gs(ten);
    IvaSummary {
        vat_at_five,
        vat_at_ten,
        exempt_total: exempt,
        vat_total: vat_at_five + vat_at_ten,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Decimal, class: VatClass) -> LedgerEntry {
        LedgerEntry {
            date: None,
            party: None,
            concept: None,
            amount: Some(amount),
            vat_class: Some(class),
            kind: None,
            category: None,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = compute_iva(&[]);
        assert_eq!(summary.vat_at_five, Decimal::ZERO);
        assert_eq!(summary.vat_at_ten, Decimal::ZERO);
        assert_eq!(summary.exempt_total, Decimal::ZERO);
        assert_eq!(summary.vat_total, Decimal::ZERO);
    }

    #[test]
    fn exempt_entries_carry_no_iva() {
        let entries = vec![
            entry(dec!(1000000), VatClass::Exempt),
            entry(dec!(250000), VatClass::Exempt),
        ];
        let summary = compute_iva(&entries);
        assert_eq!(summary.vat_total, Decimal::ZERO);
        assert_eq!(summary.exempt_total, dec!(1250000));
    }

    #[test]
    fn ten_percent_is_a_tenth_of_gross_over_eleven() {
        // 110,000 gross at 10% inclusive carries 10,000 of IVA
        let summary = compute_iva(&[entry(dec!(110000), VatClass::Ten)]);
        assert_eq!(summary.vat_at_ten, dec!(10000));
        assert_eq!(summary.vat_total, dec!(10000));
    }

    #[test]
    fn five_percent_uses_five_over_one_hundred_five() {
        // 105,000 gross at 5% inclusive carries 5,000 of IVA
        let summary = compute_iva(&[entry(dec!(105000), VatClass::Five)]);
        assert_eq!(summary.vat_at_five, dec!(5000));
        assert_eq!(summary.vat_total, dec!(5000));
    }

    #[test]
    fn buckets_round_to_whole_guaranies() {
        // 100 * 10/110 = 9.0909... -> 9
        let summary = compute_iva(&[entry(dec!(100), VatClass::Ten)]);
        assert_eq!(summary.vat_at_ten, dec!(9));
        // 100 * 5/105 = 4.7619... -> 5
        let summary = compute_iva(&[entry(dec!(100), VatClass::Five)]);
        assert_eq!(summary.vat_at_five, dec!(5));
    }

    #[test]
    fn total_sums_rounded_buckets_not_raw_sums() {
        // 10 * 5/105 = 0.476 -> 0 and 5 * 10/110 = 0.454 -> 0; the raw sum
        // 0.93 would round to 1, the per-bucket total must stay 0.
        let entries = vec![
            entry(dec!(10), VatClass::Five),
            entry(dec!(5), VatClass::Ten),
        ];
        let summary = compute_iva(&entries);
        assert_eq!(summary.vat_at_five, Decimal::ZERO);
        assert_eq!(summary.vat_at_ten, Decimal::ZERO);
        assert_eq!(summary.vat_total, Decimal::ZERO);
        assert_eq!(
            summary.vat_total,
            summary.vat_at_five + summary.vat_at_ten
        );
    }

    #[test]
    fn incomplete_entries_are_skipped() {
        let mut no_amount = entry(dec!(0), VatClass::Ten);
        no_amount.amount = None;
        let mut no_class = entry(dec!(500000), VatClass::Ten);
        no_class.vat_class = None;

        let entries = vec![no_amount, no_class, entry(dec!(110000), VatClass::Ten)];
        let summary = compute_iva(&entries);
        assert_eq!(summary.vat_at_ten, dec!(10000));
        assert_eq!(summary.vat_total, dec!(10000));
    }

    #[test]
    fn classes_aggregate_independently() {
        let entries = vec![
            entry(dec!(110000), VatClass::Ten),
            entry(dec!(220000), VatClass::Ten),
            entry(dec!(105000), VatClass::Five),
            entry(dec!(50000), VatClass::Exempt),
        ];
        let summary = compute_iva(&entries);
        assert_eq!(summary.vat_at_ten, dec!(30000));
        assert_eq!(summary.vat_at_five, dec!(5000));
        assert_eq!(summary.exempt_total, dec!(50000));
        assert_eq!(summary.vat_total, dec!(35000));
    }
}
