//! Split engine: who owes what on a receipt.
//!
//! Each allocated item is divided evenly between its assignees and the pieces
//! are summed per member. Missing or foreign references never raise; they just
//! contribute nothing.

use crate::amount::Amount;
use crate::member::{MemberShare, Roster};
use crate::receipt::Receipt;
use log::debug;
use serde::Serialize;

/// Computes every roster member's amount due on a receipt.
///
/// Shares come back in roster order, including members who owe nothing.
/// An item's amount is divided by the full size of its assignee set, so an
/// assignee missing from the roster still takes its piece; that piece is
/// simply not credited to anyone.
pub fn compute_shares(receipt: &Receipt, roster: &Roster) -> Vec<MemberShare> {
    let mut shares: Vec<MemberShare> = roster.members().iter().map(MemberShare::new).collect();

    for item in &receipt.items {
        let assignees = match receipt.allocations.assignees(&item.id) {
            Some(set) if !set.is_empty() => set,
            _ => {
                debug!("Receipt {}: item {} is unallocated", receipt.id, item.id);
                continue;
            }
        };

        let per_member = item.amount.split(assignees.len());

        for member_id in assignees {
            match roster.position(member_id) {
                Some(idx) => shares[idx].amount_due += per_member,
                None => debug!(
                    "Receipt {}: ignoring unknown member {} on item {}",
                    receipt.id, member_id, item.id
                ),
            }
        }
    }

    shares
}

/// One item as seen from a single member's side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberItemShare {
    pub item_id: String,
    pub description: String,

    /// Full item amount.
    pub amount: Amount,

    /// This member's piece of the item.
    pub amount_share: Amount,

    /// Size of the item's assignee set.
    pub total_participants: usize,
}

impl MemberItemShare {
    /// Returns `true` if the item is split with anyone else.
    pub fn is_shared(&self) -> bool {
        self.total_participants > 1
    }
}

/// Lists the items a member is allocated, in item order.
pub fn member_items(receipt: &Receipt, member_id: &str) -> Vec<MemberItemShare> {
    receipt
        .items
        .iter()
        .filter_map(|item| {
            let assignees = receipt.allocations.assignees(&item.id)?;
            if !assignees.contains(member_id) {
                return None;
            }
            Some(MemberItemShare {
                item_id: item.id.clone(),
                description: item.description.clone(),
                amount: item.amount,
                amount_share: item.amount.split(assignees.len()),
                total_participants: assignees.len(),
            })
        })
        .collect()
}

/// Sum of the amounts of items with at least one assignee.
pub fn allocated_total(receipt: &Receipt) -> Amount {
    receipt
        .items
        .iter()
        .filter(|item| {
            receipt
                .allocations
                .assignees(&item.id)
                .map(|set| !set.is_empty())
                .unwrap_or(false)
        })
        .map(|item| item.amount)
        .sum()
}
