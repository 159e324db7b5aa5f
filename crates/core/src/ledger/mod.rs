pub mod cache;

use crate::balance::{Balance, BalanceAggregator};
use crate::domain::{Expense, GroupId, Money, SettlementRecord};
use crate::settlement::{SettlementOptimizer, SettlementSuggestion};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use cache::{HistoryFingerprint, SummaryCache};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Balances and transfers at or below this magnitude (in minor units)
    /// are treated as settled
    pub dust_tolerance: Money,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            dust_tolerance: Money::ZERO,
        }
    }
}

/// Source of a group's historical records
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All non-cancelled expenses of the group
    async fn expenses(&self, group: &GroupId) -> crate::Result<Vec<Expense>>;

    /// All confirmed settlement records of the group
    async fn confirmed_settlements(&self, group: &GroupId) -> crate::Result<Vec<SettlementRecord>>;
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    async fn expenses(&self, group: &GroupId) -> crate::Result<Vec<Expense>> {
        (**self).expenses(group).await
    }

    async fn confirmed_settlements(&self, group: &GroupId) -> crate::Result<Vec<SettlementRecord>> {
        (**self).confirmed_settlements(group).await
    }
}

/// Balances and settle-up plan for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub balances: Vec<Balance>,
    pub suggestions: Vec<SettlementSuggestion>,
}

impl GroupSummary {
    /// Checks whether no payments are needed
    pub fn is_settled(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Read-side service deriving group summaries from a store
pub struct GroupLedger<S> {
    store: S,
    config: LedgerConfig,
}

impl<S: LedgerStore> GroupLedger<S> {
    /// Creates the service; a negative dust tolerance is raised to zero
    pub fn new(store: S, mut config: LedgerConfig) -> Self {
        if config.dust_tolerance.is_negative() {
            warn!("Negative dust tolerance {} replaced by zero", config.dust_tolerance);
            config.dust_tolerance = Money::ZERO;
        }
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current member balances of a group
    pub async fn balances(&self, group: &GroupId) -> crate::Result<Vec<Balance>> {
        let (expenses, settlements) = self.fetch(group).await?;
        Ok(self.aggregator().compute_balances(&expenses, &settlements))
    }

    /// Balances plus the payments that settle them
    pub async fn summary(&self, group: &GroupId) -> crate::Result<GroupSummary> {
        let (expenses, settlements) = self.fetch(group).await?;
        Ok(self.summarize(group, &expenses, &settlements))
    }

    /// Like [`GroupLedger::summary`], reusing `cache` while the history is unchanged
    pub async fn summary_cached(
        &self,
        group: &GroupId,
        cache: &mut SummaryCache,
    ) -> crate::Result<GroupSummary> {
        let (expenses, settlements) = self.fetch(group).await?;
        let fingerprint = HistoryFingerprint::of(&expenses, &settlements);

        let summary = cache.get_or_insert_with(group, fingerprint, || {
            self.summarize(group, &expenses, &settlements)
        });
        Ok(summary.clone())
    }

    fn summarize(
        &self,
        group: &GroupId,
        expenses: &[Expense],
        settlements: &[SettlementRecord],
    ) -> GroupSummary {
        let balances = self.aggregator().compute_balances(expenses, settlements);
        let suggestions = SettlementOptimizer::new(self.config.dust_tolerance).optimize(&balances);

        info!(
            "Group {}: {} members, {} suggested payments",
            group,
            balances.len(),
            suggestions.len()
        );

        GroupSummary {
            group_id: group.clone(),
            balances,
            suggestions,
        }
    }

    async fn fetch(&self, group: &GroupId) -> crate::Result<(Vec<Expense>, Vec<SettlementRecord>)> {
        let mut expenses = self.store.expenses(group).await?;
        let mut settlements = self.store.confirmed_settlements(group).await?;

        let before = (expenses.len(), settlements.len());
        expenses.retain(|e| !e.is_cancelled() && &e.group_id == group);
        settlements.retain(|s| s.is_confirmed() && &s.group_id == group);

        if before != (expenses.len(), settlements.len()) {
            warn!(
                "Store returned {} out-of-scope records for group {}",
                before.0 + before.1 - expenses.len() - settlements.len(),
                group
            );
        }

        Ok((expenses, settlements))
    }

    fn aggregator(&self) -> BalanceAggregator {
        BalanceAggregator::new(self.config.dust_tolerance)
    }
}
