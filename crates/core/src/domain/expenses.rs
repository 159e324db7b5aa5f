use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::members::{ExpenseId, GroupId, MemberId};
use super::money::Money;
use crate::{Error, Result};

/// A shared expense paid up front by one member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    /// Unique expense identifier
    pub id: ExpenseId,

    /// Owning group
    pub group_id: GroupId,

    /// Member who paid the bill
    pub payer: MemberId,

    /// Base amount before charges
    pub amount: Money,

    /// Tax, service charge, tip and discount
    #[serde(default)]
    pub charges: Charges,

    /// How the bill is divided
    pub split: SplitPolicy,

    /// Receipt lines, used by the by-item policy
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Computed (or caller-supplied) shares
    #[serde(default)]
    pub shares: Vec<Share>,

    /// Lifecycle status
    #[serde(default)]
    pub status: ExpenseStatus,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Extra charges applied on top of the base amount
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charges {
    #[serde(default)]
    pub tax: Money,

    #[serde(default)]
    pub service_charge: Money,

    #[serde(default)]
    pub tip: Money,

    /// Subtracted from the total
    #[serde(default)]
    pub discount: Money,
}

impl Charges {
    /// Net extra amount: tax + service charge + tip - discount
    pub fn net(&self) -> Money {
        self.tax + self.service_charge + self.tip - self.discount
    }
}

/// Split policy tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Every participant owes the same amount
    Equal,

    /// Each member owes the items assigned to them plus a proportional slice of the charges
    ByItem,

    /// Each member owes a fixed fraction of the total
    ByPercentage {
        allocations: Vec<PercentageAllocation>,
    },

    /// Shares are supplied by the caller as-is
    ByAmount,
}

/// A member's fraction of the total in basis points (10_000 = 100%)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PercentageAllocation {
    pub member_id: MemberId,
    pub basis_points: u32,
}

/// A single receipt line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,

    /// Members sharing this line; empty means nobody is charged for it
    #[serde(default)]
    pub assigned_to: Vec<MemberId>,
}

impl LineItem {
    /// Creates a line item with `line_total = quantity * unit_price`
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        assigned_to: Vec<MemberId>,
    ) -> Result<Self> {
        let name = name.into();
        let line_total = unit_price.checked_mul(i64::from(quantity)).ok_or_else(|| {
            Error::AmountOverflow(format!("{quantity} x {unit_price} for item {name:?}"))
        })?;

        Ok(Self {
            name,
            quantity,
            unit_price,
            line_total,
            assigned_to,
        })
    }
}

/// One member's portion of an expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Share {
    pub member_id: MemberId,
    pub amount: Money,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Share {
    /// Creates an unpaid share
    pub fn unpaid(member_id: MemberId, amount: Money) -> Self {
        Self {
            member_id,
            amount,
            paid: false,
            paid_at: None,
        }
    }

    /// Creates a share already paid at `paid_at`
    pub fn paid(member_id: MemberId, amount: Money, paid_at: DateTime<Utc>) -> Self {
        Self {
            member_id,
            amount,
            paid: true,
            paid_at: Some(paid_at),
        }
    }
}

/// Expense lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Settled,
    /// Excluded from every balance computation
    Cancelled,
}

impl Expense {
    /// Creates a pending expense with no charges, items or shares
    pub fn new(
        id: impl Into<ExpenseId>,
        group_id: impl Into<GroupId>,
        payer: impl Into<MemberId>,
        amount: Money,
        split: SplitPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            payer: payer.into(),
            amount,
            charges: Charges::default(),
            split,
            items: Vec::new(),
            shares: Vec::new(),
            status: ExpenseStatus::Pending,
            updated_at: Utc::now(),
        }
    }

    pub fn with_charges(mut self, charges: Charges) -> Self {
        self.charges = charges;
        self
    }

    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_shares(mut self, shares: Vec<Share>) -> Self {
        self.shares = shares;
        self
    }

    /// Base amount plus net charges
    pub fn total_payable(&self) -> Money {
        self.amount + self.charges.net()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ExpenseStatus::Cancelled
    }

    /// Sum of the items' line totals
    pub fn item_subtotal(&self) -> Money {
        self.items.iter().map(|item| item.line_total).sum()
    }

    /// The payer's own share amount, zero if the payer has no share
    pub fn payer_share(&self) -> Money {
        self.shares
            .iter()
            .filter(|share| share.member_id == self.payer)
            .map(|share| share.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_expense() -> Expense {
        Expense::new("e1", "g1", "a", Money::new(100_000), SplitPolicy::Equal).with_charges(
            Charges {
                tax: Money::new(10_000),
                service_charge: Money::new(5_000),
                tip: Money::new(2_000),
                discount: Money::new(7_000),
            },
        )
    }

    #[test]
    fn test_total_payable_subtracts_discount() {
        let expense = create_test_expense();
        assert_eq!(expense.charges.net(), Money::new(10_000));
        assert_eq!(expense.total_payable(), Money::new(110_000));
    }

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("coffee", 3, Money::new(2_500), vec![MemberId::from("a")]).unwrap();
        assert_eq!(item.line_total, Money::new(7_500));

        let res = LineItem::new("yacht", u32::MAX, Money::new(i64::MAX / 2), vec![]);
        assert!(matches!(res, Err(Error::AmountOverflow(_))));
    }

    #[test]
    fn test_payer_share_defaults_to_zero() {
        let mut expense = create_test_expense();
        assert_eq!(expense.payer_share(), Money::ZERO);

        expense.shares = vec![
            Share::unpaid(MemberId::from("a"), Money::new(40_000)),
            Share::unpaid(MemberId::from("b"), Money::new(70_000)),
        ];
        assert_eq!(expense.payer_share(), Money::new(40_000));
    }

    #[test]
    fn test_split_policy_json_tags() {
        let json = serde_json::to_value(SplitPolicy::ByItem).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "by_item" }));

        let policy: SplitPolicy = serde_json::from_value(serde_json::json!({
            "type": "by_percentage",
            "allocations": [{ "member_id": "a", "basis_points": 10000 }]
        }))
        .unwrap();
        assert!(matches!(policy, SplitPolicy::ByPercentage { ref allocations } if allocations.len() == 1));

        let unknown = serde_json::from_value::<SplitPolicy>(serde_json::json!({ "type": "by_weight" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_share_json_field_names() {
        let share = Share::unpaid(MemberId::from("b"), Money::new(100));
        let json = serde_json::to_value(&share).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "member_id": "b", "amount": 100, "paid": false, "paid_at": null })
        );
    }
}
