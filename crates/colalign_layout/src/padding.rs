//! Pairwise padding calculator
//!
//! Every adjacent pair is evaluated on its own: the current column is assumed
//! to start on an aligned offset and no running offset is carried across the
//! row. Downstream reports depend on these pairwise numbers.
//!
//! Variable-length columns never pad before or after them: their recorded
//! size is a placeholder, not the stored width.

use crate::catalog::Alignment;
use crate::column::ColumnDescriptor;

/// Filler bytes needed after a value of `current_size` bytes so that the next
/// value starts on its boundary. Zero when there is no next value or it has
/// no alignment requirement.
#[inline]
pub fn wasted_padding(current_size: u32, next_alignment: Option<Alignment>) -> u32 {
    let Some(boundary) = next_alignment.and_then(Alignment::boundary) else {
        return 0;
    };
    (boundary - current_size % boundary) % boundary
}

/// Per-row waste scaled over every stored row.
#[inline]
pub fn total_wasted_space(padding: u32, row_count: u64) -> u64 {
    u64::from(padding).saturating_mul(row_count)
}

/// Padding after `column` when `next_alignment` follows it. Zero after a
/// variable-length column.
#[inline]
pub fn padding_after(column: &ColumnDescriptor, next_alignment: Option<Alignment>) -> u32 {
    if column.type_alignment.is_variable() {
        return 0;
    }
    wasted_padding(column.type_size, next_alignment)
}

/// Padding after each column when laid out in the given order.
pub fn padding_sequence<'a, I>(columns: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a ColumnDescriptor>,
{
    let mut columns = columns.into_iter().peekable();
    let mut padding = Vec::with_capacity(columns.size_hint().0);
    while let Some(column) = columns.next() {
        let next_alignment = columns.peek().map(|next| next.type_alignment);
        padding.push(padding_after(column, next_alignment));
    }
    padding
}

/// Padding per row for the whole order.
pub fn total_padding<'a, I>(columns: I) -> u64
where
    I: IntoIterator<Item = &'a ColumnDescriptor>,
{
    padding_sequence(columns).into_iter().map(u64::from).sum()
}
