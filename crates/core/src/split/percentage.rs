use super::Allocation;
use crate::domain::{Money, PercentageAllocation};
use crate::math::apply_basis_points;
use crate::{Error, Result};

const FULL_BASIS_POINTS: u32 = 10_000;

/// Charges each member a fixed fraction of `total`.
///
/// Allocations must add up to exactly 100% and name each member once.
pub fn split_by_percentage(total: Money, allocations: &[PercentageAllocation]) -> Result<Allocation> {
    if allocations.is_empty() {
        return Err(Error::InvalidPercentages("no allocations given".to_string()));
    }

    let sum: u64 = allocations.iter().map(|a| u64::from(a.basis_points)).sum();
    if sum != u64::from(FULL_BASIS_POINTS) {
        return Err(Error::InvalidPercentages(format!(
            "allocations add up to {sum} basis points, expected {FULL_BASIS_POINTS}"
        )));
    }

    for (i, allocation) in allocations.iter().enumerate() {
        if allocations[..i].iter().any(|prev| prev.member_id == allocation.member_id) {
            return Err(Error::InvalidPercentages(format!(
                "{} is allocated more than once",
                allocation.member_id
            )));
        }
    }

    Ok(allocations
        .iter()
        .map(|a| (a.member_id.clone(), apply_basis_points(total, a.basis_points)))
        .collect())
}
