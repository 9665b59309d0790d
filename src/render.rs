use std::fmt::Write as _;

use crate::model::{TableModel, display_text};

/// Renders a fixed-width text table: header line, dashed separator, then
/// one line per row. Cells are padded with spaces into aligned columns;
/// embedded newlines, carriage returns, and tabs are flattened to spaces.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| sanitize(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers
        .iter()
        .map(|name| name.chars().count().max(3))
        .collect();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, headers.iter().map(String::as_str), &widths);
    let dashes: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut output, dashes.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(
            &mut output,
            row.iter().map(String::as_str).take(column_count),
            &widths,
        );
    }
    output
}

/// Renders the first `limit` current rows of a model, or all of them when
/// `limit` is 0. Null cells come out empty.
pub fn render_preview(model: &TableModel, limit: usize) -> String {
    let take = if limit == 0 {
        model.row_count()
    } else {
        limit.min(model.row_count())
    };
    let rows: Vec<Vec<String>> = model
        .rows()
        .iter()
        .take(take)
        .map(|row| {
            row.iter()
                .map(|cell| display_text(cell).to_string())
                .collect()
        })
        .collect();
    render_table(model.column_names(), &rows)
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (idx, cell) in cells.enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let width = widths.get(idx).copied().unwrap_or(0);
        let used = cell.chars().count();
        if used < width {
            line.push_str(&" ".repeat(width - used));
        }
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}
