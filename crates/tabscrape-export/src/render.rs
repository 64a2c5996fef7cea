//! CSV and JSON rendering

use crate::table::Table;
use crate::ExportError;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Render as CSV with a header row and `\n` line endings
pub fn to_csv(table: &Table) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// Render as a pretty-printed JSON array of objects keyed by column name
///
/// Keys keep the table's column order; values stay strings.
pub fn to_json(table: &Table) -> Result<String, ExportError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    Records(table).serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| ExportError::Encoding(e.to_string()))
}

struct Records<'a>(&'a Table);

struct Record<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for row in self.0.rows() {
            seq.serialize_element(&Record {
                columns: self.0.columns(),
                values: row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Table {
        Table::from_csv("name,price\nWidget,9.99\n\"Gadget, large\",4.50").unwrap()
    }

    #[test]
    fn test_csv_quotes_when_needed() {
        let csv = to_csv(&products()).unwrap();
        assert_eq!(csv, "name,price\nWidget,9.99\n\"Gadget, large\",4.50\n");
    }

    #[test]
    fn test_json_records_keep_column_order() {
        let table = Table::from_csv("zeta,alpha\n1,2").unwrap();
        let json = to_json(&table).unwrap();
        assert_eq!(
            json,
            "[\n    {\n        \"zeta\": \"1\",\n        \"alpha\": \"2\"\n    }\n]"
        );
    }

    #[test]
    fn test_json_parses_back() {
        let json = to_json(&products()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["name"], "Gadget, large");
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_empty_table() {
        let table = Table::from_csv("a,b").unwrap();
        assert_eq!(to_json(&table).unwrap(), "[]");
    }
}
