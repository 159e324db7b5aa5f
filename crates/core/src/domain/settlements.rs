use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::members::{ExpenseId, GroupId, MemberId, SettlementId};
use super::money::Money;
use crate::{Error, Result};

/// A payment recorded between two members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementRecord {
    pub id: SettlementId,
    pub group_id: GroupId,

    /// Member who paid
    pub from: MemberId,

    /// Member who received the payment
    pub to: MemberId,

    pub amount: Money,
    pub status: SettlementStatus,

    /// Expense that prompted the payment, if any
    #[serde(default)]
    pub expense_id: Option<ExpenseId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Settlement record lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Awaiting the recipient
    Pending,
    /// Acknowledged by the recipient; counts toward balances
    Confirmed,
    /// Declined by the recipient
    Rejected,
}

impl SettlementRecord {
    /// Records a pending payment from `from` to `to`
    pub fn record_payment(
        id: impl Into<SettlementId>,
        group_id: impl Into<GroupId>,
        from: impl Into<MemberId>,
        to: impl Into<MemberId>,
        amount: Money,
        expense_id: Option<ExpenseId>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let from = from.into();
        let to = to.into();

        if !amount.is_positive() {
            return Err(Error::InvalidSettlement(format!(
                "amount must be positive, got {amount}"
            )));
        }

        if from == to {
            return Err(Error::InvalidSettlement(format!(
                "{from} cannot pay themselves"
            )));
        }

        Ok(Self {
            id: id.into(),
            group_id: group_id.into(),
            from,
            to,
            amount,
            status: SettlementStatus::Pending,
            expense_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Marks the payment as received. Only the recipient may confirm.
    pub fn confirm(&mut self, by: &MemberId, now: DateTime<Utc>) -> Result<()> {
        self.transition(by, SettlementStatus::Confirmed, now)
    }

    /// Declines the payment. Only the recipient may reject.
    pub fn reject(&mut self, by: &MemberId, now: DateTime<Utc>) -> Result<()> {
        self.transition(by, SettlementStatus::Rejected, now)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == SettlementStatus::Confirmed
    }

    fn transition(
        &mut self,
        by: &MemberId,
        target: SettlementStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if by != &self.to {
            return Err(Error::InvalidSettlementTransition(format!(
                "only {} can act on settlement {}, not {by}",
                self.to, self.id
            )));
        }

        if self.status != SettlementStatus::Pending {
            return Err(Error::InvalidSettlementTransition(format!(
                "settlement {} is already {:?}",
                self.id, self.status
            )));
        }

        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}
