//! Excel workbook output and its HTML preview

use crate::table::Table;
use crate::ExportError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use quick_xml::escape::escape;
use rust_xlsxwriter::{Format, Workbook};

/// CSS classes on the preview table
pub const PREVIEW_CLASSES: &str = "table table-bordered table-striped";

/// Build a single-sheet `.xlsx` workbook: header row, then data rows
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        let col = column_index(col)?;
        worksheet
            .write_string_with_format(0, col, name.as_str(), &header_format)
            .map_err(excel_error)?;
    }

    for (row_index, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(row_index + 1)
            .map_err(|_| ExportError::Excel("too many rows for a worksheet".to_string()))?;
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_number, column_index(col)?, value.as_str())
                .map_err(excel_error)?;
        }
    }

    workbook.save_to_buffer().map_err(excel_error)
}

/// The workbook from [`to_xlsx`], base64-encoded
pub fn to_excel_base64(table: &Table) -> Result<String, ExportError> {
    Ok(STANDARD.encode(to_xlsx(table)?))
}

/// Render an HTML `<table>` preview with escaped cell text
pub fn to_html_preview(table: &Table) -> String {
    let mut html = String::new();
    html.push_str("<table border=\"1\" class=\"dataframe ");
    html.push_str(PREVIEW_CLASSES);
    html.push_str("\">\n  <thead>\n    <tr style=\"text-align: right;\">\n");
    for column in table.columns() {
        html.push_str("      <th>");
        html.push_str(&escape(column.as_str()));
        html.push_str("</th>\n");
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in table.rows() {
        html.push_str("    <tr>\n");
        for value in row {
            html.push_str("      <td>");
            html.push_str(&escape(value.as_str()));
            html.push_str("</td>\n");
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    html
}

fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::Excel("too many columns for a worksheet".to_string()))
}

fn excel_error(e: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Excel(e.to_string())
}
