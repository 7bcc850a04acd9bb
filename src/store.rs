//! In-memory receipt store.
//!
//! Holds receipts in insertion order together with the group roster. Every
//! write is validated before it touches stored state, so a failed call leaves
//! the store unchanged. Writes take `&mut self`; concurrent edits to the same
//! receipt are serialized by the borrow and the last write wins.

use crate::allocation::Allocations;
use crate::amount::Amount;
use crate::config::{ReferencePolicy, StoreConfig};
use crate::error::{Result, SplitError};
use crate::import::ItemImport;
use crate::member::{MemberShare, Roster};
use crate::receipt::{Receipt, ReceiptItem, ReceiptPatch};
use crate::split::{self, MemberItemShare};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::thread;

/// Receipts shown per history page.
pub const HISTORY_PAGE_SIZE: usize = 8;

/// Vendor given to freshly uploaded receipts until they are reviewed.
pub const UPLOAD_VENDOR: &str = "New Vendor";

/// The receipt store.
///
/// # Reference checks
///
/// With [`ReferencePolicy::Lenient`] the store accepts allocations keyed by
/// items the receipt does not have and members outside the roster; the split
/// engine ignores them. With [`ReferencePolicy::Strict`] such writes fail.
pub struct ReceiptStore {
    receipts: Vec<Receipt>,
    roster: Roster,
    config: StoreConfig,
}

impl ReceiptStore {
    /// Creates an empty store for the given roster.
    pub fn new(roster: Roster, config: StoreConfig) -> Self {
        ReceiptStore {
            receipts: Vec::new(),
            roster,
            config,
        }
    }

    /// Creates a store holding the sample receipts and the default group.
    pub fn seeded(config: StoreConfig) -> Self {
        let mut store = ReceiptStore::new(Roster::default_group(), config);
        store.receipts = sample_receipts();
        store
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Returns every receipt in insertion order.
    pub fn fetch_all(&self) -> Vec<Receipt> {
        self.simulate_latency();
        self.receipts.clone()
    }

    /// Returns a copy of one receipt.
    pub fn fetch_by_id(&self, id: &str) -> Result<Receipt> {
        self.simulate_latency();
        let idx = self.index_of(id)?;
        Ok(self.receipts[idx].clone())
    }

    /// Merges the given fields into a receipt and returns the result.
    ///
    /// Fields the patch leaves out are kept. `total` is not recomputed from
    /// new items; include it in the patch to change it.
    pub fn update(&mut self, id: &str, patch: ReceiptPatch) -> Result<Receipt> {
        self.simulate_latency();
        let idx = self.index_of(id)?;

        let mut updated = self.receipts[idx].clone();
        updated.apply(patch);

        if self.config.references == ReferencePolicy::Strict {
            validate_items(&updated.items)?;
            let removed: Vec<String> = updated
                .dangling_allocations()
                .into_iter()
                .map(str::to_string)
                .collect();
            for item_id in removed {
                warn!("Receipt {}: pruning allocation for removed item {}", id, item_id);
                updated.allocations.remove_item(&item_id);
            }
        }

        if updated.total_drifted() {
            debug!(
                "Receipt {}: total {} differs from item sum {}",
                id,
                updated.total,
                updated.items_total()
            );
        }

        info!("Updated receipt {}", id);
        self.receipts[idx] = updated;
        Ok(self.receipts[idx].clone())
    }

    /// Replaces a receipt's entire allocation mapping.
    pub fn set_allocations(&mut self, id: &str, allocations: Allocations) -> Result<Receipt> {
        self.simulate_latency();
        let idx = self.index_of(id)?;

        if self.config.references == ReferencePolicy::Strict {
            self.validate_allocations(&self.receipts[idx], &allocations)?;
        }

        info!(
            "Set {} allocation(s) on receipt {}",
            allocations.len(),
            id
        );
        self.receipts[idx].allocations = allocations;
        Ok(self.receipts[idx].clone())
    }

    /// Stores a blank receipt for an uploaded file, dated today.
    ///
    /// No receipt processing happens; vendor, items and total are filled in
    /// later through [`ReceiptStore::update`].
    pub fn upload(&mut self, source_name: &str) -> Receipt {
        let today = chrono::Local::now().date_naive();
        self.upload_on(source_name, today)
    }

    /// Stores a blank receipt for an uploaded file with an explicit date.
    pub fn upload_on(&mut self, source_name: &str, date: NaiveDate) -> Receipt {
        self.simulate_latency();

        let receipt = Receipt::new(self.next_id(), UPLOAD_VENDOR, date);
        info!("Uploaded {} as receipt {}", source_name, receipt.id);
        self.receipts.push(receipt.clone());
        receipt
    }

    /// Stores imported items as a new receipt in a single step.
    ///
    /// The receipt's total is the sum of its items and empty assignee sets
    /// are dropped. Reference checks run before anything is stored, so a
    /// rejected import leaves the store unchanged.
    pub fn import(
        &mut self,
        vendor: &str,
        date: NaiveDate,
        import: ItemImport,
    ) -> Result<Receipt> {
        self.simulate_latency();

        let mut receipt = Receipt::new(self.next_id(), vendor, date)
            .with_items(import.items)
            .with_allocations(import.allocations.without_empty());
        receipt.recompute_total();

        if self.config.references == ReferencePolicy::Strict {
            validate_items(&receipt.items)?;
            self.validate_allocations(&receipt, &receipt.allocations)?;
        }

        info!(
            "Imported {} item(s) from {} as receipt {}",
            receipt.items.len(),
            vendor,
            receipt.id
        );
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    /// Id the next uploaded or imported receipt will get: `rec-<len+1>`,
    /// advanced past ids already taken.
    pub fn next_id(&self) -> String {
        let mut n = self.receipts.len() + 1;
        let mut id = format!("rec-{}", n);
        while self.index_of(&id).is_ok() {
            n += 1;
            id = format!("rec-{}", n);
        }
        id
    }

    /// Returns one 1-based page of receipts in insertion order.
    ///
    /// Page 0, pages past the end and a zero page size yield nothing.
    pub fn page(&self, page: usize, per_page: usize) -> Vec<Receipt> {
        if page == 0 || per_page == 0 {
            return Vec::new();
        }
        self.simulate_latency();
        self.receipts
            .iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect()
    }

    /// Number of pages needed to show every receipt.
    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        self.receipts.len().div_ceil(per_page)
    }

    /// Computes what each roster member owes on a receipt.
    pub fn shares(&self, id: &str) -> Result<Vec<MemberShare>> {
        let receipt = self.fetch_by_id(id)?;
        Ok(split::compute_shares(&receipt, &self.roster))
    }

    /// Lists the items one member pays for on a receipt.
    pub fn member_items(&self, id: &str, member_id: &str) -> Result<Vec<MemberItemShare>> {
        let receipt = self.fetch_by_id(id)?;
        Ok(split::member_items(&receipt, member_id))
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.receipts
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SplitError::NotFound { id: id.to_string() })
    }

    fn simulate_latency(&self) {
        if let Some(latency) = self.config.latency {
            thread::sleep(latency);
        }
    }

    fn validate_allocations(&self, receipt: &Receipt, allocations: &Allocations) -> Result<()> {
        if let Some(item_id) = allocations.dangling_items(receipt.item_ids()).first() {
            return Err(SplitError::DanglingAllocation {
                receipt_id: receipt.id.clone(),
                item_id: item_id.to_string(),
            });
        }

        if let Some(member_id) = allocations
            .member_ids()
            .into_iter()
            .find(|m| !self.roster.contains(m))
        {
            return Err(SplitError::UnknownMember {
                receipt_id: receipt.id.clone(),
                member_id: member_id.to_string(),
            });
        }

        Ok(())
    }
}

fn validate_items(items: &[ReceiptItem]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if item.amount.is_negative() {
            return Err(SplitError::NegativeAmount {
                item_id: item.id.clone(),
            });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(SplitError::DuplicateItem {
                item_id: item.id.clone(),
            });
        }
    }
    Ok(())
}

fn sample_receipts() -> Vec<Receipt> {
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        // literal calendar dates only
        NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date")
    }

    fn items(rows: &[(&str, &str, i64)]) -> Vec<ReceiptItem> {
        rows.iter()
            .map(|(id, description, cents)| {
                ReceiptItem::new(*id, *description, Amount::from_cents(*cents))
            })
            .collect()
    }

    vec![
        Receipt::new("rec-1", "Grocery Store", date(2025, 4, 15))
            .with_total(Amount::from_cents(2499))
            .with_items(items(&[
                ("item-1", "Milk", 499),
                ("item-2", "Bread", 349),
                ("item-3", "Eggs", 599),
                ("item-4", "Cheese", 649),
                ("item-5", "Apples", 403),
            ]))
            .with_allocations(Allocations::from_pairs([
                ("item-1", vec!["user-1", "user-2"]),
                ("item-2", vec!["user-1", "user-3"]),
                ("item-3", vec!["user-2"]),
                ("item-4", vec!["user-3", "user-4"]),
                ("item-5", vec!["user-1", "user-2", "user-3", "user-4"]),
            ])),
        Receipt::new("rec-2", "Restaurant", date(2025, 4, 14))
            .with_total(Amount::from_cents(4550))
            .with_items(items(&[
                ("item-6", "Dinner", 3550),
                ("item-7", "Drinks", 1000),
            ]))
            .with_allocations(Allocations::from_pairs([
                ("item-6", vec!["user-1", "user-2", "user-3", "user-4"]),
                ("item-7", vec!["user-1", "user-2", "user-3"]),
            ])),
        Receipt::new("rec-3", "Gas Station", date(2025, 4, 13))
            .with_total(Amount::from_cents(3575))
            .with_items(items(&[("item-8", "Fuel", 3575)]))
            .with_allocations(Allocations::from_pairs([(
                "item-8",
                vec!["user-1", "user-4"],
            )])),
        Receipt::new("rec-4", "Pharmacy", date(2025, 4, 10))
            .with_total(Amount::from_cents(1299))
            .with_items(items(&[
                ("item-9", "Medicine", 899),
                ("item-10", "Toiletries", 400),
            ]))
            .with_allocations(Allocations::from_pairs([
                ("item-9", vec!["user-3"]),
                ("item-10", vec!["user-2", "user-3"]),
            ])),
        Receipt::new("rec-5", "Coffee Shop", date(2025, 4, 8))
            .with_total(Amount::from_cents(1875))
            .with_items(items(&[
                ("item-11", "Coffee", 525),
                ("item-12", "Sandwich", 850),
                ("item-13", "Pastry", 500),
            ]))
            .with_allocations(Allocations::from_pairs([
                ("item-11", vec!["user-1"]),
                ("item-12", vec!["user-3"]),
                ("item-13", vec!["user-2"]),
            ])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::{Duration, Instant};

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_seeded_store_insertion_order() {
        let store = ReceiptStore::seeded(StoreConfig::default());
        let ids: Vec<String> = store.fetch_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["rec-1", "rec-2", "rec-3", "rec-4", "rec-5"]);
    }

    #[test]
    fn test_seeded_totals_match_items() {
        let store = ReceiptStore::seeded(StoreConfig::default());
        for receipt in store.fetch_all() {
            assert!(!receipt.total_drifted(), "{} drifted", receipt.id);
        }
    }

    #[test]
    fn test_fetch_missing_receipt() {
        let store = ReceiptStore::seeded(StoreConfig::default());
        let err = store.fetch_by_id("rec-99").unwrap_err();
        assert!(matches!(err, SplitError::NotFound { ref id } if id == "rec-99"));
    }

    #[test]
    fn test_upload_assigns_next_id() {
        let mut store = ReceiptStore::seeded(StoreConfig::default());
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let receipt = store.upload_on("scan.jpg", date);

        assert_eq!(receipt.id, "rec-6");
        assert_eq!(receipt.vendor, UPLOAD_VENDOR);
        assert_eq!(receipt.date, date);
        assert!(receipt.items.is_empty());
        assert!(receipt.total.is_zero());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_upload_skips_taken_ids() {
        let mut store = ReceiptStore::new(Roster::default_group(), StoreConfig::default());
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        store.upload_on("a.jpg", date);
        store.receipts[0].id = "rec-2".to_string();

        assert_eq!(store.upload_on("b.jpg", date).id, "rec-3");
    }

    #[test]
    fn test_update_strict_prunes_removed_items() {
        let mut store = ReceiptStore::seeded(StoreConfig::strict());
        let receipt = store
            .update(
                "rec-2",
                ReceiptPatch::new().items(vec![ReceiptItem::new("item-6", "Dinner", amt("35.50"))]),
            )
            .unwrap();

        assert!(receipt.allocations.assignees("item-7").is_none());
        assert!(receipt.allocations.assignees("item-6").is_some());
    }

    #[test]
    fn test_update_lenient_keeps_dangling_allocations() {
        let mut store = ReceiptStore::seeded(StoreConfig::default());
        let receipt = store
            .update(
                "rec-2",
                ReceiptPatch::new().items(vec![ReceiptItem::new("item-6", "Dinner", amt("35.50"))]),
            )
            .unwrap();

        assert_eq!(receipt.dangling_allocations(), vec!["item-7"]);
    }

    #[test]
    fn test_latency_is_applied() {
        let store = ReceiptStore::seeded(
            StoreConfig::default().with_latency(Duration::from_millis(20)),
        );
        let start = Instant::now();
        store.fetch_by_id("rec-1").unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_paging() {
        let mut store = ReceiptStore::seeded(StoreConfig::default());
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        for _ in 0..5 {
            store.upload_on("scan.jpg", date);
        }

        assert_eq!(store.page_count(HISTORY_PAGE_SIZE), 2);
        assert_eq!(store.page(1, HISTORY_PAGE_SIZE).len(), 8);

        let second = store.page(2, HISTORY_PAGE_SIZE);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].id, "rec-9");

        assert!(store.page(0, HISTORY_PAGE_SIZE).is_empty());
        assert!(store.page(3, HISTORY_PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_seeded_grocery_shares() {
        let store = ReceiptStore::seeded(StoreConfig::default());
        let shares = store.shares("rec-1").unwrap();
        let due: Vec<String> = shares.iter().map(|s| s.amount_due.to_string()).collect();

        // Milk/2 + Bread/2 + Apples/4 for Alex, and so on.
        assert_eq!(due, ["5.25", "9.49", "6.00", "4.25"]);
    }
}
