use crate::domain::Money;

/// Integer division rounding half away from zero.
///
/// Returns `None` when `denominator` is zero.
pub fn div_round_half_away(numerator: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    // Rust division truncates toward zero, so only the magnitude of the
    // remainder decides whether to step away from zero.
    if remainder.abs() * 2 >= denominator.abs() {
        let away = if (numerator < 0) == (denominator < 0) { 1 } else { -1 };
        Some(quotient + away)
    } else {
        Some(quotient)
    }
}

/// Divides an amount into `parts` equal portions, each rounded to the minor unit.
///
/// The remainder is not redistributed: `portion * parts` may differ from
/// `total` by up to `parts - 1` minor units.
pub fn split_evenly(total: Money, parts: usize) -> Option<Money> {
    let rounded = div_round_half_away(i128::from(total.minor_units()), parts as i128)?;
    i64::try_from(rounded).ok().map(Money::new)
}

/// Allocates `amount * weight / total_weight`, rounded to the minor unit.
///
/// A zero `total_weight` allocates nothing.
pub fn prorate(amount: Money, weight: Money, total_weight: Money) -> Money {
    let numerator = i128::from(amount.minor_units()) * i128::from(weight.minor_units());
    div_round_half_away(numerator, i128::from(total_weight.minor_units()))
        .and_then(|v| i64::try_from(v).ok())
        .map(Money::new)
        .unwrap_or(Money::ZERO)
}

/// Scales an amount by a ratio expressed in basis points (10_000 = 100%).
pub fn apply_basis_points(amount: Money, basis_points: u32) -> Money {
    prorate(amount, Money::new(i64::from(basis_points)), Money::new(10_000))
}

/// Checks whether an amount is within `tolerance` of zero
pub fn is_negligible(amount: Money, tolerance: Money) -> bool {
    amount.abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(div_round_half_away(5, 2), Some(3));
        assert_eq!(div_round_half_away(-5, 2), Some(-3));
        assert_eq!(div_round_half_away(4, 3), Some(1));
        assert_eq!(div_round_half_away(-4, 3), Some(-1));
        assert_eq!(div_round_half_away(5, -2), Some(-3));
        assert_eq!(div_round_half_away(1, 0), None);
    }

    #[test]
    fn test_split_evenly_keeps_remainder() {
        let portion = split_evenly(Money::new(10_000), 3).unwrap();
        assert_eq!(portion, Money::new(3_333));
        assert_eq!(portion.minor_units() * 3, 9_999);

        let portion = split_evenly(Money::new(200), 3).unwrap();
        assert_eq!(portion, Money::new(67));
        assert_eq!(portion.minor_units() * 3, 201);

        assert!(split_evenly(Money::new(100), 0).is_none());
    }

    #[test]
    fn test_prorate() {
        let share = prorate(Money::new(10_000), Money::new(60_000), Money::new(100_000));
        assert_eq!(share, Money::new(6_000));

        let negative = prorate(Money::new(-1_000), Money::new(1), Money::new(3));
        assert_eq!(negative, Money::new(-333));

        assert_eq!(prorate(Money::new(500), Money::new(1), Money::ZERO), Money::ZERO);
    }

    #[test]
    fn test_basis_points() {
        assert_eq!(apply_basis_points(Money::new(10_000), 2_500), Money::new(2_500));
        assert_eq!(apply_basis_points(Money::new(1_001), 5_000), Money::new(501));
    }

    #[test]
    fn test_negligible() {
        assert!(is_negligible(Money::new(-1), Money::new(1)));
        assert!(!is_negligible(Money::new(2), Money::new(1)));
        assert!(is_negligible(Money::ZERO, Money::ZERO));
    }
}
