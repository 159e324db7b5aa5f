use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Group member identifier
    MemberId
);
string_id!(
    /// Expense-sharing group identifier
    GroupId
);
string_id!(
    /// Expense identifier
    ExpenseId
);
string_id!(
    /// Settlement record identifier
    SettlementId
);

/// Member lookup used to resolve participants and render names.
///
/// Names are presentation-only; no computation depends on them.
pub trait MemberDirectory {
    /// Current members of a group, in roster order
    fn group_members(&self, group: &GroupId) -> Vec<MemberId>;

    /// Checks whether `member` belongs to `group`
    fn contains(&self, group: &GroupId, member: &MemberId) -> bool {
        self.group_members(group).contains(member)
    }

    /// Display name for a member, if known
    fn display_name(&self, member: &MemberId) -> Option<&str>;
}

impl<D: MemberDirectory + ?Sized> MemberDirectory for &D {
    fn group_members(&self, group: &GroupId) -> Vec<MemberId> {
        (**self).group_members(group)
    }

    fn contains(&self, group: &GroupId, member: &MemberId) -> bool {
        (**self).contains(group, member)
    }

    fn display_name(&self, member: &MemberId) -> Option<&str> {
        (**self).display_name(member)
    }
}

/// In-memory member directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Group -> ordered member ids
    #[serde(default)]
    groups: HashMap<GroupId, Vec<MemberId>>,

    /// Member -> display name
    #[serde(default)]
    names: HashMap<MemberId, String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member to a group. Re-adding an existing member only updates the name.
    pub fn add_member(
        &mut self,
        group: impl Into<GroupId>,
        member: impl Into<MemberId>,
        name: impl Into<String>,
    ) -> &mut Self {
        let member = member.into();
        let members = self.groups.entry(group.into()).or_default();
        if !members.contains(&member) {
            members.push(member.clone());
        }
        self.names.insert(member, name.into());
        self
    }
}

impl MemberDirectory for Roster {
    fn group_members(&self, group: &GroupId) -> Vec<MemberId> {
        self.groups.get(group).cloned().unwrap_or_default()
    }

    fn contains(&self, group: &GroupId, member: &MemberId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(member))
    }

    fn display_name(&self, member: &MemberId) -> Option<&str> {
        self.names.get(member).map(String::as_str)
    }
}
