//! CSV import of receipt line items with their assignees.
//!
//! Expected columns: `id,description,amount,assignees`, where `assignees`
//! holds member ids separated by `;` and may be empty. Rows are read one at a
//! time; invalid rows are logged at warn level and skipped.

use crate::allocation::Allocations;
use crate::amount::Amount;
use crate::error::{Result, SplitError};
use crate::receipt::ReceiptItem;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

/// Separator between member ids in the `assignees` column.
pub const ASSIGNEE_SEPARATOR: char = ';';

/// Raw item row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub amount: String,

    #[serde(default)]
    pub assignees: Option<String>,
}

impl ItemRecord {
    /// Parses the row into an item and its assignee ids.
    pub fn parse(&self, row: usize) -> Result<(ReceiptItem, Vec<String>)> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(invalid(row, "missing item id"));
        }

        let amount = Amount::from_str(&self.amount)
            .map_err(|e| invalid(row, format!("bad amount {:?}: {}", self.amount, e)))?;
        if amount.is_negative() {
            return Err(SplitError::NegativeAmount {
                item_id: id.to_string(),
            });
        }

        let assignees = self
            .assignees
            .as_deref()
            .unwrap_or("")
            .split(ASSIGNEE_SEPARATOR)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        Ok((
            ReceiptItem::new(id, self.description.trim(), amount),
            assignees,
        ))
    }
}

fn invalid(row: usize, message: impl Into<String>) -> SplitError {
    SplitError::InvalidRecord {
        row,
        message: message.into(),
    }
}

/// Items and allocations read from one CSV file.
#[derive(Debug, Default)]
pub struct ItemImport {
    pub items: Vec<ReceiptItem>,
    pub allocations: Allocations,

    /// Rows that were logged and dropped.
    pub skipped: usize,
}

/// Reads item rows from CSV.
///
/// Only I/O failures abort the import; malformed rows, negative amounts and
/// repeated item ids are skipped.
pub fn read_items<R: Read>(reader: R) -> Result<ItemImport> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut import = ItemImport::default();
    let mut seen = HashSet::new();

    for (row_idx, result) in csv_reader.deserialize::<ItemRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                import.skipped += 1;
                continue;
            }
        };

        let (item, assignees) = match record.parse(row_num) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Row {}: {}", row_num, e);
                import.skipped += 1;
                continue;
            }
        };

        if !seen.insert(item.id.clone()) {
            warn!("Row {}: Duplicate item ID {}, ignoring", row_num, item.id);
            import.skipped += 1;
            continue;
        }

        debug!(
            "Row {}: item {} ({}) split {} way(s)",
            row_num,
            item.id,
            item.amount,
            assignees.len()
        );
        for member_id in &assignees {
            import.allocations.assign(&item.id, member_id);
        }
        import.items.push(item);
    }

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn import_str(csv: &str) -> ItemImport {
        read_items(Cursor::new(csv)).unwrap()
    }

    #[test]
    fn test_reads_items_and_assignees() {
        let csv = r#"id,description,amount,assignees
item-1,Milk,4.99,user-1;user-2
item-2,Bread,3.49,user-3"#;

        let import = import_str(csv);
        assert_eq!(import.items.len(), 2);
        assert_eq!(import.items[0].description, "Milk");
        assert_eq!(import.allocations.assignees("item-1").unwrap().len(), 2);
        assert!(import.allocations.is_assigned("item-2", "user-3"));
        assert_eq!(import.skipped, 0);
    }

    #[test]
    fn test_unassigned_item_has_no_allocation() {
        let csv = r#"id,description,amount,assignees
item-1,Milk,4.99,
item-2,Bread,3.49"#;

        let import = import_str(csv);
        assert_eq!(import.items.len(), 2);
        assert!(import.allocations.is_empty());
    }

    #[test]
    fn test_whitespace_handling() {
        let csv = "id, description, amount, assignees\n item-1 , Milk , 4.99 , user-1 ; user-2 \n";

        let import = import_str(csv);
        assert_eq!(import.items[0].id, "item-1");
        assert_eq!(import.items[0].amount, Amount::from_cents(499));
        assert!(import.allocations.is_assigned("item-1", "user-2"));
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let csv = r#"id,description,amount,assignees
item-1,Milk,abc,user-1
item-2,Bread,-3.49,user-1
,Eggs,1.00,user-1
item-3,Cheese,6.49,user-2
item-3,Cheese again,1.00,user-3"#;

        let import = import_str(csv);
        assert_eq!(import.items.len(), 1);
        assert_eq!(import.items[0].id, "item-3");
        assert!(!import.allocations.is_assigned("item-3", "user-3"));
        assert_eq!(import.skipped, 4);
    }

    #[test]
    fn test_parse_reports_row() {
        let record = ItemRecord {
            id: "item-1".to_string(),
            description: String::new(),
            amount: "ten".to_string(),
            assignees: None,
        };
        let err = record.parse(7).unwrap_err();
        assert!(matches!(err, SplitError::InvalidRecord { row: 7, .. }));
    }
}
