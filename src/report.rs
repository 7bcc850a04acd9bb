//! CSV reports for receipts, shares and per-member breakdowns.
//!
//! All monetary values are formatted with exactly 2 decimal places.

use crate::error::Result;
use crate::member::MemberShare;
use crate::receipt::Receipt;
use crate::split::MemberItemShare;
use std::io::Write;

/// Writes one history page: `id,vendor,date,total,items`.
pub fn write_history<W: Write>(writer: W, receipts: &[Receipt]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["id", "vendor", "date", "total", "items"])?;

    for receipt in receipts {
        csv_writer.write_record([
            receipt.id.clone(),
            receipt.vendor.clone(),
            receipt.date.format("%Y-%m-%d").to_string(),
            receipt.total.to_string(),
            receipt.items.len().to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes member shares in roster order: `member,name,amount_due,status`.
pub fn write_shares<W: Write>(writer: W, shares: &[MemberShare]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["member", "name", "amount_due", "status"])?;

    for share in shares {
        csv_writer.write_record([
            share.member_id.as_str(),
            share.name.as_str(),
            share.amount_due.to_string().as_str(),
            share.status(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes one member's items: `item,description,amount,participants,share`.
pub fn write_member_items<W: Write>(writer: W, items: &[MemberItemShare]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["item", "description", "amount", "participants", "share"])?;

    for item in items {
        csv_writer.write_record([
            item.item_id.clone(),
            item.description.clone(),
            item.amount.to_string(),
            item.total_participants.to_string(),
            item.amount_share.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
