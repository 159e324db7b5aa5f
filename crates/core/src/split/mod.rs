pub mod equal;
pub mod itemized;
pub mod percentage;

use crate::domain::{Expense, MemberDirectory, MemberId, Money, Share, SplitPolicy};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Per-member amounts before paid flags are attached
pub type Allocation = Vec<(MemberId, Money)>;

/// Computes the shares of a single expense according to its split policy
pub struct SplitCalculator<D> {
    directory: D,
}

impl<D: MemberDirectory> SplitCalculator<D> {
    /// Creates a calculator resolving members through `directory`
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Computes shares, stamping the payer's share as paid now
    pub fn compute(&self, expense: &Expense, participants: Option<&[MemberId]>) -> Result<Vec<Share>> {
        self.compute_at(expense, participants, Utc::now())
    }

    /// Computes shares, stamping the payer's share as paid at `now`.
    ///
    /// `participants` only applies to the equal policy; when absent every
    /// current group member participates.
    pub fn compute_at(
        &self,
        expense: &Expense,
        participants: Option<&[MemberId]>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Share>> {
        let allocation = match &expense.split {
            SplitPolicy::Equal => {
                let participants = self.resolve_participants(expense, participants)?;
                equal::split_equally(expense.total_payable(), &participants)?
            }
            SplitPolicy::ByItem => {
                for item in &expense.items {
                    for member in &item.assigned_to {
                        self.ensure_known(expense, member)?;
                    }
                }
                itemized::split_by_item(expense)?
            }
            SplitPolicy::ByPercentage { allocations } => {
                for allocation in allocations {
                    self.ensure_known(expense, &allocation.member_id)?;
                }
                percentage::split_by_percentage(expense.total_payable(), allocations)?
            }
            SplitPolicy::ByAmount => {
                debug!("Expense {} carries caller-supplied shares", expense.id);
                return Ok(expense.shares.clone());
            }
        };

        debug!(
            "Split expense {} ({:?}) into {} shares",
            expense.id,
            expense.split,
            allocation.len()
        );

        Ok(allocation
            .into_iter()
            .map(|(member_id, amount)| {
                if member_id == expense.payer {
                    Share::paid(member_id, amount, now)
                } else {
                    Share::unpaid(member_id, amount)
                }
            })
            .collect())
    }

    /// Computes the expense's shares and stores them on it.
    ///
    /// Balances only see shares that were attached, so every new expense
    /// goes through here before it is appended to the history.
    pub fn attach(&self, expense: &mut Expense, participants: Option<&[MemberId]>) -> Result<()> {
        expense.shares = self.compute(expense, participants)?;
        Ok(())
    }

    /// Explicit participants (deduplicated, in order) or the whole group
    fn resolve_participants(
        &self,
        expense: &Expense,
        participants: Option<&[MemberId]>,
    ) -> Result<Vec<MemberId>> {
        let Some(explicit) = participants else {
            return Ok(self.directory.group_members(&expense.group_id));
        };

        let mut resolved: Vec<MemberId> = Vec::with_capacity(explicit.len());
        for member in explicit {
            self.ensure_known(expense, member)?;
            if !resolved.contains(member) {
                resolved.push(member.clone());
            }
        }
        Ok(resolved)
    }

    fn ensure_known(&self, expense: &Expense, member: &MemberId) -> Result<()> {
        if self.directory.contains(&expense.group_id, member) {
            Ok(())
        } else {
            Err(Error::UnresolvableMemberReference(format!(
                "{member} is not a member of group {}",
                expense.group_id
            )))
        }
    }
}

/// Computes the shares of `expense` against `directory`
pub fn compute_split<D: MemberDirectory>(
    directory: D,
    expense: &Expense,
    participants: Option<&[MemberId]>,
) -> Result<Vec<Share>> {
    SplitCalculator::new(directory).compute(expense, participants)
}
