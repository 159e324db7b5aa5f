use super::Allocation;
use crate::domain::{MemberId, Money};
use crate::math::split_evenly;
use crate::{Error, Result};

/// Divides `total` evenly among `participants`.
///
/// Every participant owes `round(total / n)`. The rounding remainder is left
/// unassigned, so the shares may sum to `total` give or take `n - 1` minor
/// units.
pub fn split_equally(total: Money, participants: &[MemberId]) -> Result<Allocation> {
    let portion = split_evenly(total, participants.len()).ok_or_else(|| {
        Error::InvalidParticipantSet("equal split needs at least one participant".to_string())
    })?;

    Ok(participants
        .iter()
        .map(|member| (member.clone(), portion))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(n: usize) -> Vec<MemberId> {
        (0..n).map(|i| MemberId(format!("m{i}"))).collect()
    }

    #[test]
    fn test_even_division() {
        let allocation = split_equally(Money::new(300_000), &members(3)).unwrap();
        assert_eq!(allocation.len(), 3);
        assert!(allocation.iter().all(|(_, amount)| *amount == Money::new(100_000)));
    }

    #[test]
    fn test_remainder_is_not_reconciled() {
        // 100.00 / 3 = 33.33 each, one cent short overall
        let allocation = split_equally(Money::new(10_000), &members(3)).unwrap();
        let total: Money = allocation.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(total, Money::new(9_999));

        // 2.00 / 3 = 0.67 each, one cent over
        let allocation = split_equally(Money::new(200), &members(3)).unwrap();
        let total: Money = allocation.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(total, Money::new(201));
    }

    #[test]
    fn test_remainder_bound() {
        for n in 1..=12 {
            let total = Money::new(100_001);
            let allocation = split_equally(total, &members(n)).unwrap();
            let sum: Money = allocation.iter().map(|(_, amount)| *amount).sum();
            assert!((sum - total).abs().minor_units() <= n as i64 - 1);
        }
    }

    #[test]
    fn test_empty_participants() {
        let res = split_equally(Money::new(100), &[]);
        assert!(matches!(res, Err(Error::InvalidParticipantSet(_))));
    }
}
