//! XML rendering: a `<data>` root with one `<item>` per row

use crate::table::Table;
use crate::ExportError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Turn a column name into a valid XML element name
///
/// Spaces become underscores and parentheses are dropped; any other
/// character not allowed in a name becomes an underscore, and a name that
/// would start with something other than a letter or underscore gets a
/// leading underscore.
pub fn sanitize_element_name(column: &str) -> String {
    let mut name: String = column
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok {
        name.insert(0, '_');
    }
    name
}

/// Render the table as XML; cell values are escaped
pub fn to_xml(table: &Table) -> Result<String, ExportError> {
    let names: Vec<String> = table
        .columns()
        .iter()
        .map(|c| sanitize_element_name(c))
        .collect();

    let mut writer = Writer::new(Vec::new());
    write(&mut writer, Event::Start(BytesStart::new("data")))?;

    for row in table.rows() {
        write(&mut writer, Event::Start(BytesStart::new("item")))?;
        for (name, value) in names.iter().zip(row) {
            write(&mut writer, Event::Start(BytesStart::new(name.as_str())))?;
            if !value.is_empty() {
                write(&mut writer, Event::Text(BytesText::new(value)))?;
            }
            write(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("data")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Encoding(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}
