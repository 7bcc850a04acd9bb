//! Error types for the receipt store and CLI.

use thiserror::Error;

/// Result type alias for store and CLI operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while working with receipts.
///
/// The split engine itself never fails; these come from the store boundary,
/// CSV import and argument handling.
#[derive(Error, Debug)]
pub enum SplitError {
    /// No receipt matches the requested id
    #[error("Receipt with ID {id} not found")]
    NotFound { id: String },

    /// Allocation keyed by an item the receipt does not contain (strict mode)
    #[error("Receipt {receipt_id} has no item {item_id} to allocate")]
    DanglingAllocation { receipt_id: String, item_id: String },

    /// Allocation names a member outside the roster (strict mode)
    #[error("Receipt {receipt_id} allocates to unknown member {member_id}")]
    UnknownMember {
        receipt_id: String,
        member_id: String,
    },

    /// Line item with an amount below zero (strict mode)
    #[error("Item {item_id} has a negative amount")]
    NegativeAmount { item_id: String },

    /// Two line items share an id (strict mode)
    #[error("Duplicate item ID {item_id}")]
    DuplicateItem { item_id: String },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid item record in an imported CSV
    #[error("Invalid item at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Bad command line
    #[error("{0}. Usage: splitease <history [page] | summary <receipt> | detail <receipt> <member> | split <items.csv>>")]
    Usage(String),
}
