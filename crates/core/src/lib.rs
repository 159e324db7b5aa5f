pub mod domain;
pub mod split;
pub mod balance;
pub mod settlement;
pub mod ledger;
pub mod report;
pub mod math;

pub use domain::{
    Charges, Expense, ExpenseId, ExpenseStatus, GroupId, LineItem, MemberDirectory, MemberId,
    Money, PercentageAllocation, Roster, SettlementId, SettlementRecord, SettlementStatus, Share,
    SplitPolicy,
};
pub use split::{compute_split, SplitCalculator};
pub use balance::{compute_group_balances, Balance, BalanceAggregator};
pub use settlement::{apply_suggestions, optimize_settlements, SettlementOptimizer, SettlementSuggestion};
pub use ledger::{GroupLedger, GroupSummary, LedgerConfig, LedgerStore};

/// Core result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid participant set: {0}")]
    InvalidParticipantSet(String),

    #[error("Missing line items: {0}")]
    MissingLineItems(String),

    #[error("Unresolvable member reference: {0}")]
    UnresolvableMemberReference(String),

    #[error("Invalid percentages: {0}")]
    InvalidPercentages(String),

    #[error("Invalid settlement: {0}")]
    InvalidSettlement(String),

    #[error("Invalid settlement transition: {0}")]
    InvalidSettlementTransition(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Ledger store error: {0}")]
    Store(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
