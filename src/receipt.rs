//! Receipt and line item models.

use crate::allocation::Allocations;
use crate::amount::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Identifier, unique within its receipt.
    pub id: String,

    pub description: String,

    /// Line amount. Expected to be non-negative.
    pub amount: Amount,
}

impl ReceiptItem {
    pub fn new(id: impl Into<String>, description: impl Into<String>, amount: Amount) -> Self {
        ReceiptItem {
            id: id.into(),
            description: description.into(),
            amount,
        }
    }
}

/// A purchase record with its line items and member allocations.
///
/// # Total
///
/// `total` is stored independently of `items` and may drift from their sum
/// after edits. Call [`Receipt::recompute_total`] to derive it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub vendor: String,
    pub date: NaiveDate,
    pub total: Amount,
    pub items: Vec<ReceiptItem>,
    pub allocations: Allocations,
}

impl Receipt {
    /// Creates a receipt with no items or allocations.
    pub fn new(id: impl Into<String>, vendor: impl Into<String>, date: NaiveDate) -> Self {
        Receipt {
            id: id.into(),
            vendor: vendor.into(),
            date,
            total: Amount::ZERO,
            items: Vec::new(),
            allocations: Allocations::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<ReceiptItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_total(mut self, total: Amount) -> Self {
        self.total = total;
        self
    }

    pub fn with_allocations(mut self, allocations: Allocations) -> Self {
        self.allocations = allocations;
        self
    }

    pub fn item(&self, item_id: &str) -> Option<&ReceiptItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut ReceiptItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    /// Sum of all line item amounts.
    pub fn items_total(&self) -> Amount {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Sets `total` to the sum of the line items and returns it.
    pub fn recompute_total(&mut self) -> Amount {
        self.total = self.items_total();
        self.total
    }

    /// Returns `true` if the stored total differs from the item sum.
    pub fn total_drifted(&self) -> bool {
        self.total != self.items_total()
    }

    /// Allocation keys that do not reference any of this receipt's items.
    pub fn dangling_allocations(&self) -> Vec<&str> {
        self.allocations.dangling_items(self.item_ids())
    }

    /// Shallow-merges a patch; fields the patch omits are kept.
    pub fn apply(&mut self, patch: ReceiptPatch) {
        if let Some(vendor) = patch.vendor {
            self.vendor = vendor;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
    }
}

/// Partial receipt fields for [`crate::ReceiptStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReceiptPatch {
    pub vendor: Option<String>,
    pub date: Option<NaiveDate>,
    pub total: Option<Amount>,
    pub items: Option<Vec<ReceiptItem>>,
}

impl ReceiptPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn total(mut self, total: Amount) -> Self {
        self.total = Some(total);
        self
    }

    pub fn items(mut self, items: Vec<ReceiptItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vendor.is_none() && self.date.is_none() && self.total.is_none() && self.items.is_none()
    }
}
