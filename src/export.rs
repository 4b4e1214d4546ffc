//! Export renderers
//!
//! Serialize the currently displayed observation list to a spreadsheet
//! (CSV) or an HTML document. Callers build an [`ExportTable`] with the
//! same columns as shown on screen; the renderers own only formatting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::error::Result;

/// A fully materialized table ready to render: a title, named columns and
/// stringified rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        ExportTable {
            title: title.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

/// Fixed HTML template; placeholders are filled by [`render_html`].
const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body { font-family: sans-serif; margin: 2em; }
h1 { margin-bottom: 0.2em; }
.meta { color: #555; margin-bottom: 1em; }
table { border-collapse: collapse; }
th, td { border: 1px solid #999; padding: 0.3em 0.6em; text-align: left; }
th { background: #eee; }
footer { margin-top: 1em; color: #777; font-size: 0.85em; }
</style>
</head>
<body>
<h1>{title}</h1>
<div class="meta">Exported {export_date} &middot; {row_count} row(s)</div>
<table>
{table_body}
</table>
<footer>Generated by obslog at {generated_at}</footer>
</body>
</html>
"#;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the table into the fixed HTML template.
pub fn render_html(table: &ExportTable) -> String {
    let mut body = String::new();
    body.push_str("<tr>");
    for column in &table.columns {
        body.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    body.push_str("</tr>\n");
    for row in &table.rows {
        body.push_str("<tr>");
        for cell in row {
            body.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        body.push_str("</tr>\n");
    }

    // The body is user data and may itself contain placeholder-looking
    // text, so it must be substituted after every other placeholder.
    let now = Local::now();
    HTML_TEMPLATE
        .replace("{title}", &escape_html(&table.title))
        .replace("{export_date}", &now.format("%Y-%m-%d").to_string())
        .replace("{row_count}", &table.rows.len().to_string())
        .replace("{generated_at}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
        .replace("{table_body}", &body)
}

/// Write the table as an HTML document.
pub fn write_html(table: &ExportTable, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(render_html(table).as_bytes())?;
    log::info!("exported {} row(s) to {}", table.rows.len(), path.display());
    Ok(())
}

/// Write the table as a CSV spreadsheet with a header row.
pub fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_io_error)?;
    writer.write_record(&table.columns).map_err(csv_io_error)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_io_error)?;
    }
    writer.flush()?;
    log::info!("exported {} row(s) to {}", table.rows.len(), path.display());
    Ok(())
}

fn csv_io_error(err: csv::Error) -> crate::error::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err).into()
}
