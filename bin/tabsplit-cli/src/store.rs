use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tabsplit_core::{
    Expense, ExpenseId, GroupId, LedgerStore, MemberId, Roster, SettlementRecord, SplitCalculator,
};
use tracing::debug;

/// A group ledger exported as a single JSON document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LedgerFile {
    #[serde(default)]
    pub roster: Roster,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub settlements: Vec<SettlementRecord>,
}

impl LedgerFile {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read ledger {}", path.display()))?;
        let file: LedgerFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse ledger {}", path.display()))?;

        debug!(
            "Loaded {} expenses and {} settlements from {}",
            file.expenses.len(),
            file.settlements.len(),
            path.display()
        );
        Ok(file)
    }

    /// Writes the ledger back as pretty-printed JSON
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self).context("failed to serialize ledger")?;
        tokio::fs::write(path, raw)
            .await
            .with_context(|| format!("failed to write ledger {}", path.display()))?;

        debug!("Saved ledger to {}", path.display());
        Ok(())
    }

    /// Computes the shares of expense `id` against the roster and stores
    /// them on the expense
    pub fn attach_shares(
        &mut self,
        id: &ExpenseId,
        participants: Option<&[MemberId]>,
    ) -> anyhow::Result<&Expense> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| &e.id == id)
            .with_context(|| format!("expense {id} not found"))?;

        SplitCalculator::new(&self.roster).attach(expense, participants)?;
        Ok(expense)
    }
}

#[async_trait]
impl LedgerStore for LedgerFile {
    async fn expenses(&self, group: &GroupId) -> tabsplit_core::Result<Vec<Expense>> {
        Ok(self
            .expenses
            .iter()
            .filter(|e| &e.group_id == group && !e.is_cancelled())
            .cloned()
            .collect())
    }

    async fn confirmed_settlements(
        &self,
        group: &GroupId,
    ) -> tabsplit_core::Result<Vec<SettlementRecord>> {
        Ok(self
            .settlements
            .iter()
            .filter(|s| &s.group_id == group && s.is_confirmed())
            .cloned()
            .collect())
    }
}
