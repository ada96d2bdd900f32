//! Printable board document and its HTML rendering.

use super::PrintScope;
use crate::engine::assignment::column_of;
use crate::model::board::Board;
use crate::model::column::Column;
use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:0;padding:20px;color:#333}\
.print-header{text-align:center;margin-bottom:30px;padding-bottom:10px;border-bottom:1px solid #ddd}\
.print-header h1{margin:0;color:#4a6da7}\
.print-header p{margin:5px 0 0;color:#777;font-size:.9em}\
.columns-container{display:flex;flex-wrap:wrap;gap:20px}\
.column{flex:1;min-width:250px;background-color:#f9f9f9;border-radius:8px;padding:15px}\
.column-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:15px;border-bottom:1px solid #eee}\
.column-header h2{margin:0;font-size:1.3em;color:#4a6da7}\
.people-count{background-color:#eee;padding:3px 8px;border-radius:12px;font-size:.8em;font-weight:bold}\
.person-item{padding:8px 10px;margin-bottom:8px;background-color:white;border-radius:4px}\
.day-assignment{font-size:.8em;background-color:#eee;padding:2px 6px;border-radius:4px;margin-left:8px}\
@media print{body{padding:0}.column{page-break-inside:avoid}}";

/// One printed person line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintEntry {
    pub name: String,
    /// Title of the assigned day column; only set on roster entries.
    pub badge: Option<String>,
}

/// One printed column block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintColumn {
    pub title: String,
    pub count: usize,
    pub entries: Vec<PrintEntry>,
}

/// Static document handed to the print sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub title: String,
    pub generated_at: String,
    pub columns: Vec<PrintColumn>,
}

impl PrintDocument {
    /// Builds the document for `scope`.
    ///
    /// Returns `None` when `scope` names a column that is not on the board.
    pub fn build(
        board: &Board,
        scope: &PrintScope,
        title: &str,
        generated_at: NaiveDateTime,
    ) -> Option<Self> {
        let selected: Vec<&Column> = match scope {
            PrintScope::All => board.columns().iter().collect(),
            PrintScope::RosterWith(column_id) => {
                let column = board.column(column_id)?;
                if column.is_roster() {
                    vec![column]
                } else {
                    vec![board.roster(), column]
                }
            }
        };

        let columns = selected
            .into_iter()
            .map(|column| print_column(board, column))
            .collect();

        Some(Self {
            title: title.to_string(),
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            columns,
        })
    }

    /// Renders a standalone HTML page. User text is escaped.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let title = escape_html(&self.title);
        html.push_str(&format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title} - Print</title>\
             <style>{STYLE}</style></head><body>\
             <div class=\"print-header\"><h1>{title}</h1><p>Generated on {}</p></div>\
             <div class=\"columns-container\">",
            escape_html(&self.generated_at)
        ));

        for column in &self.columns {
            html.push_str(&format!(
                "<div class=\"column\"><div class=\"column-header\"><h2>{}</h2>\
                 <span class=\"people-count\">{}</span></div>",
                escape_html(&column.title),
                column.count
            ));
            for entry in &column.entries {
                html.push_str(&format!(
                    "<div class=\"person-item\">{}",
                    escape_html(&entry.name)
                ));
                if let Some(badge) = &entry.badge {
                    html.push_str(&format!(
                        "<span class=\"day-assignment\">{}</span>",
                        escape_html(badge)
                    ));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }

        html.push_str("</div></body></html>");
        html
    }
}

fn print_column(board: &Board, column: &Column) -> PrintColumn {
    let entries = column
        .people
        .iter()
        .map(|person| PrintEntry {
            name: person.name.clone(),
            badge: if column.is_roster() {
                column_of(board, &person.id).map(|day| day.title.clone())
            } else {
                None
            },
        })
        .collect();

    PrintColumn {
        title: column.title.clone(),
        count: column.person_count(),
        entries,
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
