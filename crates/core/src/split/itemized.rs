use super::Allocation;
use crate::domain::{Expense, MemberId, Money};
use crate::math::{prorate, split_evenly};
use crate::{Error, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Charges each member for the items assigned to them.
///
/// Each line total is divided evenly among its assignees. The net charges
/// (tax + service + tip - discount) are then spread in proportion to each
/// member's item subtotal. Members appear in order of first assignment.
pub fn split_by_item(expense: &Expense) -> Result<Allocation> {
    if expense.items.is_empty() {
        return Err(Error::MissingLineItems(format!(
            "expense {} has no line items",
            expense.id
        )));
    }

    let mut totals: IndexMap<MemberId, Money> = IndexMap::new();

    for item in &expense.items {
        let mut assignees: Vec<&MemberId> = Vec::with_capacity(item.assigned_to.len());
        for member in &item.assigned_to {
            if !assignees.contains(&member) {
                assignees.push(member);
            }
        }

        let Some(portion) = split_evenly(item.line_total, assignees.len()) else {
            debug!("Item {:?} on expense {} has no assignees", item.name, expense.id);
            continue;
        };

        for member in assignees {
            *totals.entry(member.clone()).or_insert(Money::ZERO) += portion;
        }
    }

    let subtotal: Money = totals.values().sum();
    let extras = expense.charges.net();

    Ok(totals
        .into_iter()
        .map(|(member, amount)| (member, amount + prorate(extras, amount, subtotal)))
        .collect())
}
