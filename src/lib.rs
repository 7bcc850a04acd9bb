//! # SplitEase
//!
//! Splits receipt expenses across a group: line items are allocated to
//! members and each member's amount due is computed from those allocations.
//!
//! ## Design Principles
//!
//! - **Equal split per item**: an item's amount is divided evenly between its assignees
//! - **Decimal arithmetic**: amounts use `rust_decimal`; rounding only for display
//! - **Total engine**: unknown members and unallocated items contribute nothing, never an error
//! - **Explicit store**: receipts live in a [`ReceiptStore`] object, validated at its boundary
//!
//! ## Example
//!
//! ```
//! use splitease::{ReceiptStore, StoreConfig, compute_shares};
//!
//! let store = ReceiptStore::seeded(StoreConfig::default());
//! let receipt = store.fetch_by_id("rec-3").unwrap();
//! let shares = compute_shares(&receipt, store.roster());
//! assert_eq!(shares[0].amount_due.to_string(), "17.88");
//! ```

pub mod allocation;
pub mod amount;
pub mod config;
pub mod error;
pub mod import;
pub mod member;
pub mod receipt;
pub mod report;
pub mod split;
pub mod store;

pub use allocation::Allocations;
pub use amount::Amount;
pub use config::{ReferencePolicy, StoreConfig};
pub use error::{Result, SplitError};
pub use member::{Member, MemberShare, Roster};
pub use receipt::{Receipt, ReceiptItem, ReceiptPatch};
pub use split::{allocated_total, compute_shares, member_items, MemberItemShare};
pub use store::{ReceiptStore, HISTORY_PAGE_SIZE};
