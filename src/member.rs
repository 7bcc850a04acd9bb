//! Group members and the roster a receipt is split across.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// A group member who can be allocated receipt items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier, e.g. `user-1`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Avatar image location.
    pub avatar_url: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// The ordered, immutable list of members in a group.
///
/// Built once at start-up. Share computations preserve roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    const PLACEHOLDER_AVATAR: &'static str = "/placeholder.svg?height=40&width=40";

    pub fn new(members: Vec<Member>) -> Self {
        Roster { members }
    }

    /// The four-person group the sample receipts are allocated to.
    pub fn default_group() -> Self {
        let avatar = Self::PLACEHOLDER_AVATAR;
        Roster::new(vec![
            Member::new("user-1", "Alex", avatar),
            Member::new("user-2", "Jamie", avatar),
            Member::new("user-3", "Taylor", avatar),
            Member::new("user-4", "Jordan", avatar),
        ])
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn contains(&self, member_id: &str) -> bool {
        self.get(member_id).is_some()
    }

    /// Position of a member in roster order.
    pub fn position(&self, member_id: &str) -> Option<usize> {
        self.members.iter().position(|m| m.id == member_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A member's total amount owed on one receipt.
///
/// Derived from a receipt's allocations; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberShare {
    pub member_id: String,
    pub name: String,
    pub amount_due: Amount,
}

impl MemberShare {
    /// Creates a zero share for a roster member.
    pub fn new(member: &Member) -> Self {
        MemberShare {
            member_id: member.id.clone(),
            name: member.name.clone(),
            amount_due: Amount::ZERO,
        }
    }

    /// Returns `true` if the member owes anything on the receipt.
    pub fn is_participating(&self) -> bool {
        self.amount_due.is_positive()
    }

    /// Human-readable status shown next to the amount.
    pub fn status(&self) -> &'static str {
        if self.is_participating() {
            "owes"
        } else {
            "not participating"
        }
    }
}
