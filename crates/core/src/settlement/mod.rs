use crate::balance::Balance;
use crate::domain::{MemberId, Money};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A suggested payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSuggestion {
    /// Member who pays
    pub from: MemberId,

    /// Member who receives
    pub to: MemberId,

    pub amount: Money,
}

/// Greedy minimum cash flow settle-up planner.
///
/// Repeatedly matches the largest remaining creditor with the largest
/// remaining debtor. Every step clears at least one of them, so `k` non-zero
/// members settle in at most `k - 1` payments, and nobody is asked to pay
/// more than their own debt.
#[derive(Debug, Clone, Default)]
pub struct SettlementOptimizer {
    /// Balances at or below this magnitude count as settled
    tolerance: Money,
}

struct Position {
    member: MemberId,
    remaining: Money,
}

impl SettlementOptimizer {
    /// Creates an optimizer; a negative tolerance is treated as zero
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.max(Money::ZERO),
        }
    }

    /// Produces the payments that settle `balances`.
    ///
    /// Equal amounts keep their input order, so the output is deterministic.
    pub fn optimize(&self, balances: &[Balance]) -> Vec<SettlementSuggestion> {
        let mut creditors: Vec<Position> = Vec::new();
        let mut debtors: Vec<Position> = Vec::new();

        for balance in balances {
            if balance.amount > self.tolerance {
                creditors.push(Position {
                    member: balance.member_id.clone(),
                    remaining: balance.amount,
                });
            } else if balance.amount < -self.tolerance {
                debtors.push(Position {
                    member: balance.member_id.clone(),
                    remaining: balance.amount.abs(),
                });
            }
        }

        // Stable sorts: ties stay in input order.
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut suggestions = Vec::new();
        let (mut ci, mut di) = (0, 0);

        while ci < creditors.len() && di < debtors.len() {
            let creditor = &mut creditors[ci];
            let debtor = &mut debtors[di];
            let transfer = creditor.remaining.min(debtor.remaining);

            if transfer > self.tolerance {
                debug!("{} pays {} {}", debtor.member, creditor.member, transfer);
                suggestions.push(SettlementSuggestion {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount: transfer,
                });
            }

            creditor.remaining -= transfer;
            debtor.remaining -= transfer;

            if creditor.remaining <= self.tolerance {
                ci += 1;
            }
            if debtor.remaining <= self.tolerance {
                di += 1;
            }
        }

        info!(
            "Planned {} payments for {} balances",
            suggestions.len(),
            balances.len()
        );

        suggestions
    }
}

/// Plans settle-up payments with exact (zero-tolerance) matching
pub fn optimize_settlements(balances: &[Balance]) -> Vec<SettlementSuggestion> {
    SettlementOptimizer::default().optimize(balances)
}

/// Returns the balances left after every suggestion is paid.
///
/// Paying raises the payer's balance and lowers the recipient's. Members
/// named only in suggestions are appended.
pub fn apply_suggestions(
    balances: &[Balance],
    suggestions: &[SettlementSuggestion],
) -> Vec<Balance> {
    let mut totals: IndexMap<MemberId, Money> = IndexMap::with_capacity(balances.len());
    for balance in balances {
        *totals.entry(balance.member_id.clone()).or_insert(Money::ZERO) += balance.amount;
    }

    for suggestion in suggestions {
        *totals.entry(suggestion.from.clone()).or_insert(Money::ZERO) += suggestion.amount;
        *totals.entry(suggestion.to.clone()).or_insert(Money::ZERO) -= suggestion.amount;
    }

    totals
        .into_iter()
        .map(|(member_id, amount)| Balance { member_id, amount })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(raw: &[(&str, i64)]) -> Vec<Balance> {
        raw.iter()
            .map(|(member, amount)| Balance {
                member_id: MemberId::from(*member),
                amount: Money::new(*amount),
            })
            .collect()
    }

    fn suggestion(from: &str, to: &str, amount: i64) -> SettlementSuggestion {
        SettlementSuggestion {
            from: MemberId::from(from),
            to: MemberId::from(to),
            amount: Money::new(amount),
        }
    }

    #[test]
    fn test_single_creditor() {
        let input = balances(&[("a", 200_000), ("b", -100_000), ("c", -100_000)]);
        let plan = optimize_settlements(&input);

        assert_eq!(
            plan,
            vec![suggestion("b", "a", 100_000), suggestion("c", "a", 100_000)]
        );
    }

    #[test]
    fn test_largest_first() {
        let input = balances(&[("a", 3_000), ("b", 7_000), ("c", -6_000), ("d", -4_000)]);
        let plan = optimize_settlements(&input);

        assert_eq!(
            plan,
            vec![
                suggestion("c", "b", 6_000),
                suggestion("d", "b", 1_000),
                suggestion("d", "a", 3_000),
            ]
        );
    }

    #[test]
    fn test_simultaneous_clear_advances_both() {
        let input = balances(&[("a", 500), ("b", 500), ("c", -500), ("d", -500)]);
        let plan = optimize_settlements(&input);
        assert_eq!(plan, vec![suggestion("c", "a", 500), suggestion("d", "b", 500)]);
    }

    #[test]
    fn test_zero_and_dust_dropped() {
        let input = balances(&[("a", 0), ("b", 1), ("c", -1)]);
        assert_eq!(optimize_settlements(&input).len(), 1);
        assert!(SettlementOptimizer::new(Money::new(1)).optimize(&input).is_empty());
        assert!(optimize_settlements(&[]).is_empty());
    }

    #[test]
    fn test_negative_tolerance_treated_as_zero() {
        let input = balances(&[("a", 0), ("b", -100), ("c", 100)]);
        let plan = SettlementOptimizer::new(Money::new(-1)).optimize(&input);
        assert_eq!(plan, vec![suggestion("b", "c", 100)]);
    }

    #[test]
    fn test_apply_appends_unknown_members() {
        let input = balances(&[("a", 100)]);
        let after = apply_suggestions(&input, &[suggestion("x", "a", 100)]);
        assert_eq!(after, balances(&[("a", 0), ("x", 100)]));
    }

    #[test]
    fn test_unbalanced_input_terminates() {
        // Unreconciled rounding can leave a creditor without a matching debtor
        let input = balances(&[("a", 6_667), ("b", -3_333), ("c", -3_333)]);
        let plan = optimize_settlements(&input);
        assert_eq!(plan.len(), 2);

        let after = apply_suggestions(&input, &plan);
        assert_eq!(after[0].amount, Money::new(1));
    }

    #[test]
    fn test_bound_correctness_and_idempotence() {
        let input = balances(&[
            ("a", 12_345),
            ("b", -2_000),
            ("c", 8_000),
            ("d", -9_999),
            ("e", 0),
            ("f", -8_346),
            ("g", 4_000),
            ("h", -4_000),
        ]);
        let nonzero = input.iter().filter(|b| !b.amount.is_zero()).count();

        let plan = optimize_settlements(&input);
        assert!(plan.len() <= nonzero.saturating_sub(1));
        assert!(plan.iter().all(|s| s.amount.is_positive()));

        let after = apply_suggestions(&input, &plan);
        assert!(after.iter().all(|b| b.amount.is_zero()));

        assert_eq!(optimize_settlements(&input), plan);
    }

    #[test]
    fn test_never_overpays_own_debt() {
        let input = balances(&[("a", 10_000), ("b", 2_500), ("c", -7_500), ("d", -5_000)]);
        let plan = optimize_settlements(&input);

        for member in ["c", "d"] {
            let paid: Money = plan
                .iter()
                .filter(|s| s.from.as_str() == member)
                .map(|s| s.amount)
                .sum();
            let owed = input
                .iter()
                .find(|b| b.member_id.as_str() == member)
                .map(|b| b.amount.abs())
                .unwrap();
            assert_eq!(paid, owed);
        }
    }

    #[test]
    fn test_suggestion_json_field_names() {
        let json = serde_json::to_value(suggestion("b", "a", 100)).unwrap();
        assert_eq!(json, serde_json::json!({ "from": "b", "to": "a", "amount": 100 }));
    }
}
