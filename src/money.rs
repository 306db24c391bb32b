use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole guaraníes, halves away from zero.
///
/// PYG has no fractional subunit, so every displayed amount and every
/// per-rate IVA bucket lands on a whole guaraní.
pub fn round_gs(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as guaraníes with dot thousand separators, e.g. "Gs. 1.234.567".
pub fn format_gs(amount: Decimal) -> String {
    let rounded = round_gs(amount);
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-Gs. {grouped}")
    } else {
        format!("Gs. {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_gs(dec!(0.5)), dec!(1));
        assert_eq!(round_gs(dec!(1.4)), dec!(1));
        assert_eq!(round_gs(dec!(2.5)), dec!(3));
        assert_eq!(round_gs(dec!(-0.5)), dec!(-1));
    }

    #[test]
    fn formats_with_dot_separators() {
        assert_eq!(format_gs(dec!(0)), "Gs. 0");
        assert_eq!(format_gs(dec!(500)), "Gs. 500");
        assert_eq!(format_gs(dec!(12000000)), "Gs. 12.000.000");
        assert_eq!(format_gs(dec!(1234567.6)), "Gs. 1.234.568");
        assert_eq!(format_gs(dec!(-45000)), "-Gs. 45.000");
    }
}
