use crate::domain::{MemberDirectory, MemberId};
use crate::ledger::GroupSummary;
use std::fmt;

/// Renders a plain-text settle-up summary.
///
/// Members are shown by display name when the directory knows them and by
/// id otherwise.
pub fn render_summary<D: MemberDirectory>(summary: &GroupSummary, directory: &D) -> String {
    SummaryReport { summary, directory }.to_string()
}

/// Text view of a [`GroupSummary`]
pub struct SummaryReport<'a, D> {
    pub summary: &'a GroupSummary,
    pub directory: &'a D,
}

impl<D: MemberDirectory> SummaryReport<'_, D> {
    fn name(&self, member: &MemberId) -> String {
        self.directory
            .display_name(member)
            .map_or_else(|| member.to_string(), str::to_string)
    }
}

impl<D: MemberDirectory> fmt::Display for SummaryReport<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;

        writeln!(f, "Group {}", summary.group_id)?;
        writeln!(f)?;
        writeln!(f, "Balances:")?;

        if summary.balances.is_empty() {
            writeln!(f, "  (no activity)")?;
        }

        let width = summary
            .balances
            .iter()
            .map(|b| self.name(&b.member_id).chars().count())
            .max()
            .unwrap_or(0);

        for balance in &summary.balances {
            let status = if balance.amount.is_positive() {
                "is owed"
            } else if balance.amount.is_negative() {
                "owes"
            } else {
                "settled"
            };
            writeln!(
                f,
                "  {:<width$}  {:>12}  {status}",
                self.name(&balance.member_id),
                balance.amount.to_string(),
            )?;
        }

        writeln!(f)?;
        if summary.is_settled() {
            return writeln!(f, "All settled up.");
        }

        writeln!(f, "Payments:")?;
        for suggestion in &summary.suggestions {
            writeln!(
                f,
                "  {} pays {} {}",
                self.name(&suggestion.from),
                self.name(&suggestion.to),
                suggestion.amount
            )?;
        }
        Ok(())
    }
}

/// Serializes a summary as pretty-printed JSON
pub fn render_json(summary: &GroupSummary) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
