//! Properties of the split engine over generated receipts.

use chrono::NaiveDate;
use proptest::prelude::*;
use splitease::{
    allocated_total, compute_shares, Allocations, Amount, Member, Receipt, ReceiptItem, Roster,
};

const MEMBER_IDS: [&str; 4] = ["m0", "m1", "m2", "m3"];

fn roster() -> Roster {
    Roster::new(
        MEMBER_IDS
            .iter()
            .map(|id| Member::new(*id, id.to_uppercase(), ""))
            .collect(),
    )
}

/// Items as (cents, assignee mask); bit `i` assigns `MEMBER_IDS[i]`.
fn build_receipt(items: &[(i64, u8)]) -> Receipt {
    let mut allocations = Allocations::new();
    let items = items
        .iter()
        .enumerate()
        .map(|(idx, (cents, mask))| {
            let id = format!("item-{}", idx);
            for (bit, member) in MEMBER_IDS.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    allocations.assign(&id, member);
                }
            }
            ReceiptItem::new(id, "generated", Amount::from_cents(*cents))
        })
        .collect();

    Receipt::new("rec-p", "Generated", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .with_items(items)
        .with_allocations(allocations)
}

fn total_due(receipt: &Receipt) -> Amount {
    compute_shares(receipt, &roster()).iter().map(|s| s.amount_due).sum()
}

proptest! {
    #[test]
    fn prop_fully_allocated_shares_sum_to_items(
        items in prop::collection::vec((0i64..100_000, 1u8..16), 0..12)
    ) {
        let receipt = build_receipt(&items);
        prop_assert!(total_due(&receipt).approx_eq(receipt.items_total()));
    }

    #[test]
    fn prop_shares_sum_to_allocated_items(
        items in prop::collection::vec((0i64..100_000, 0u8..16), 0..12)
    ) {
        let receipt = build_receipt(&items);
        prop_assert!(total_due(&receipt).approx_eq(allocated_total(&receipt)));
    }

    #[test]
    fn prop_unassigned_item_changes_nothing(
        items in prop::collection::vec((0i64..100_000, 0u8..16), 0..8),
        extra in 0i64..100_000
    ) {
        let before = compute_shares(&build_receipt(&items), &roster());

        let mut with_extra = items.clone();
        with_extra.push((extra, 0));
        let after = compute_shares(&build_receipt(&with_extra), &roster());

        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_absent_member_owes_nothing(
        items in prop::collection::vec((0i64..100_000, 0u8..8), 0..12)
    ) {
        // Masks below 8 never assign m3.
        let shares = compute_shares(&build_receipt(&items), &roster());
        prop_assert!(shares[3].amount_due.is_zero());
    }

    #[test]
    fn prop_roster_order_preserved(
        items in prop::collection::vec((0i64..100_000, 0u8..16), 0..12)
    ) {
        let shares = compute_shares(&build_receipt(&items), &roster());
        let ids: Vec<&str> = shares.iter().map(|s| s.member_id.as_str()).collect();
        prop_assert_eq!(ids, MEMBER_IDS.to_vec());
    }
}

#[test]
fn test_two_way_example() {
    let receipt = build_receipt(&[(1000, 0b11)]);
    let shares = compute_shares(&receipt, &roster());

    assert_eq!(shares[0].amount_due.to_string(), "5.00");
    assert_eq!(shares[1].amount_due.to_string(), "5.00");
}

#[test]
fn test_mixed_items_example() {
    let receipt = build_receipt(&[(900, 0b01), (600, 0b11)]);
    let shares = compute_shares(&receipt, &roster());

    assert_eq!(shares[0].amount_due.to_string(), "12.00");
    assert_eq!(shares[1].amount_due.to_string(), "3.00");
}

#[test]
fn test_ghost_assignee_example() {
    let receipt = Receipt::new("rec-g", "Ghost", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .with_items(vec![ReceiptItem::new("i1", "Shared", Amount::from_cents(1000))])
        .with_allocations(Allocations::from_pairs([("i1", vec!["A", "ghost"])]));
    let roster = Roster::new(vec![Member::new("A", "A", "")]);

    let shares = compute_shares(&receipt, &roster);
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].amount_due.to_string(), "5.00");
}
