pub mod money;
pub mod members;
pub mod expenses;
pub mod settlements;

pub use money::Money;
pub use members::{ExpenseId, GroupId, MemberDirectory, MemberId, Roster, SettlementId};
pub use expenses::{
    Charges, Expense, ExpenseStatus, LineItem, PercentageAllocation, Share, SplitPolicy,
};
pub use settlements::{SettlementRecord, SettlementStatus};
