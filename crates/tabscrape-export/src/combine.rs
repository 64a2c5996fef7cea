//! Combination of per-document tables into one
//!
//! The first table fixes the column layout. Each later table is accepted
//! when it has the same number of columns, in which case its columns are
//! renamed onto the first table's; any other table is skipped.

use crate::table::Table;
use tracing::warn;

/// Result of combining several tables
#[derive(Debug, Clone)]
pub struct Combined {
    /// The combined table
    pub table: Table,

    /// Tables that contributed rows (including the first)
    pub accepted: usize,

    /// Tables skipped for a column count mismatch
    pub rejected: usize,
}

/// Combine tables by column count
///
/// Returns `None` when `tables` is empty.
pub fn combine<I>(tables: I) -> Option<Combined>
where
    I: IntoIterator<Item = Table>,
{
    let mut tables = tables.into_iter();
    let mut master = tables.next()?;
    let mut accepted = 1;
    let mut rejected = 0;

    for mut table in tables {
        if table.width() != master.width() {
            warn!(
                "Skipping table due to column count mismatch. Expected {}, got {}",
                master.width(),
                table.width()
            );
            rejected += 1;
            continue;
        }
        table.rename_columns(master.columns());
        master.append_rows(table);
        accepted += 1;
    }

    Some(Combined {
        table: master,
        accepted,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::from_csv(text).unwrap()
    }

    #[test]
    fn test_combine_renames_onto_first_columns() {
        let combined = combine(vec![
            table("name,price\nWidget,9.99"),
            table("product,cost\nGadget,4.50"),
        ])
        .unwrap();

        assert_eq!(combined.table.columns(), &["name", "price"]);
        assert_eq!(combined.table.row_count(), 2);
        assert_eq!(combined.table.rows()[1], vec!["Gadget", "4.50"]);
        assert_eq!(combined.accepted, 2);
    }

    #[test]
    fn test_combine_skips_mismatched_width() {
        let combined = combine(vec![
            table("name,price\nWidget,9.99"),
            table("name,price,stock\nGadget,4.50,3"),
            table("name,price\nGizmo,1.00"),
        ])
        .unwrap();

        assert_eq!(combined.table.row_count(), 2);
        assert_eq!(combined.rejected, 1);
    }

    #[test]
    fn test_combine_nothing() {
        assert!(combine(Vec::new()).is_none());
    }
}
