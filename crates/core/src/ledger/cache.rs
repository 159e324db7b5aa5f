use super::GroupSummary;
use crate::domain::{Expense, GroupId, SettlementRecord};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Cheap identity of a group's history: record counts plus the latest
/// modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryFingerprint(u64);

impl HistoryFingerprint {
    pub fn of(expenses: &[Expense], settlements: &[SettlementRecord]) -> Self {
        let last_modified = expenses
            .iter()
            .map(|e| e.updated_at)
            .chain(settlements.iter().map(|s| s.updated_at))
            .max();

        let mut hasher = DefaultHasher::new();
        expenses.len().hash(&mut hasher);
        settlements.len().hash(&mut hasher);
        last_modified.map(|t| t.timestamp_nanos_opt()).hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Caller-owned memo of group summaries.
///
/// Entries are only reused while the fingerprint matches; the summary is
/// always recomputable from the history alone.
#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<GroupId, (HistoryFingerprint, GroupSummary)>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached summary for `group` if `fingerprint` still matches,
    /// otherwise computes and stores a fresh one
    pub fn get_or_insert_with<F>(
        &mut self,
        group: &GroupId,
        fingerprint: HistoryFingerprint,
        compute: F,
    ) -> &GroupSummary
    where
        F: FnOnce() -> GroupSummary,
    {
        let stale = self
            .entries
            .get(group)
            .map_or(true, |(cached, _)| *cached != fingerprint);

        if stale {
            debug!("Summary cache miss for group {}", group);
            self.entries
                .insert(group.clone(), (fingerprint, compute()));
        }

        &self.entries[group].1
    }

    pub fn invalidate(&mut self, group: &GroupId) {
        self.entries.remove(group);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, SplitPolicy};
    use chrono::Duration;

    fn create_test_summary(group: &str) -> GroupSummary {
        GroupSummary {
            group_id: GroupId::from(group),
            balances: vec![],
            suggestions: vec![],
        }
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let mut expense = Expense::new("e1", "g1", "a", Money::new(100), SplitPolicy::Equal);
        let base = HistoryFingerprint::of(std::slice::from_ref(&expense), &[]);
        assert_eq!(base, HistoryFingerprint::of(std::slice::from_ref(&expense), &[]));

        expense.updated_at = expense.updated_at + Duration::seconds(1);
        assert_ne!(base, HistoryFingerprint::of(std::slice::from_ref(&expense), &[]));

        assert_ne!(base, HistoryFingerprint::of(&[], &[]));
    }

    #[test]
    fn test_reuses_until_fingerprint_changes() {
        let mut cache = SummaryCache::new();
        let group = GroupId::from("g1");
        let first = HistoryFingerprint::of(&[], &[]);
        let expense = Expense::new("e1", "g1", "a", Money::new(100), SplitPolicy::Equal);
        let second = HistoryFingerprint::of(&[expense], &[]);

        let mut calls = 0;
        cache.get_or_insert_with(&group, first, || {
            calls += 1;
            create_test_summary("g1")
        });
        cache.get_or_insert_with(&group, first, || {
            calls += 1;
            create_test_summary("g1")
        });
        assert_eq!(calls, 1);

        cache.get_or_insert_with(&group, second, || {
            calls += 1;
            create_test_summary("g1")
        });
        assert_eq!(calls, 2);

        cache.invalidate(&group);
        assert!(cache.is_empty());
    }
}
