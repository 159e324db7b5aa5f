use crate::domain::{Expense, MemberId, Money, SettlementRecord};
use crate::math::is_negligible;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Net position of a member across the group's history.
///
/// Positive means the member is owed money, negative means they owe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub member_id: MemberId,
    pub amount: Money,
}

/// Derives member balances from expense and settlement history
#[derive(Debug, Clone, Default)]
pub struct BalanceAggregator {
    /// Balances at or below this magnitude are reported as zero
    dust_tolerance: Money,
}

impl BalanceAggregator {
    /// Creates an aggregator snapping balances within `dust_tolerance` to zero.
    /// A negative tolerance is treated as zero.
    pub fn new(dust_tolerance: Money) -> Self {
        Self {
            dust_tolerance: dust_tolerance.max(Money::ZERO),
        }
    }

    /// Computes one balance per member appearing in any expense or confirmed
    /// settlement, zero balances included.
    ///
    /// Cancelled expenses and non-confirmed settlements are ignored, so the
    /// full unfiltered history may be passed in.
    pub fn compute_balances(
        &self,
        expenses: &[Expense],
        settlements: &[SettlementRecord],
    ) -> Vec<Balance> {
        // Running totals in first-seen member order
        let mut tally: IndexMap<MemberId, Money> = IndexMap::new();

        for expense in expenses.iter().filter(|e| !e.is_cancelled()) {
            tally.entry(expense.payer.clone()).or_insert(Money::ZERO);

            if expense.shares.is_empty() {
                warn!(
                    "Expense {} has no shares, {} is credited the full amount",
                    expense.id, expense.payer
                );
            }

            // Shares already paid back are no longer owed to the payer.
            let mut repaid = Money::ZERO;
            for share in &expense.shares {
                if share.member_id == expense.payer {
                    continue;
                }
                let owed = tally.entry(share.member_id.clone()).or_insert(Money::ZERO);
                if share.paid {
                    repaid += share.amount;
                } else {
                    *owed -= share.amount;
                }
            }

            let fronted = expense.total_payable() - expense.payer_share() - repaid;
            *tally.entry(expense.payer.clone()).or_insert(Money::ZERO) += fronted;

            debug!("Expense {}: {} fronted {}", expense.id, expense.payer, fronted);
        }

        for settlement in settlements.iter().filter(|s| s.is_confirmed()) {
            *tally.entry(settlement.from.clone()).or_insert(Money::ZERO) += settlement.amount;
            *tally.entry(settlement.to.clone()).or_insert(Money::ZERO) -= settlement.amount;
        }

        let balances: Vec<Balance> = tally
            .into_iter()
            .map(|(member_id, raw)| {
                let amount = if is_negligible(raw, self.dust_tolerance) {
                    Money::ZERO
                } else {
                    raw
                };
                Balance { member_id, amount }
            })
            .collect();

        info!(
            "Computed {} balances from {} expenses and {} settlements",
            balances.len(),
            expenses.len(),
            settlements.len()
        );

        balances
    }
}

/// Computes group balances with exact (zero-tolerance) snapping
pub fn compute_group_balances(
    expenses: &[Expense],
    confirmed_settlements: &[SettlementRecord],
) -> Vec<Balance> {
    BalanceAggregator::default().compute_balances(expenses, confirmed_settlements)
}
