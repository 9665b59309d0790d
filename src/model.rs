//! Inner-memory table backing an interactive editor: current rows/columns,
//! the original snapshot captured at first population, the last stable
//! (pre-filter) snapshot, advisory column kinds, and delimiter/header
//! configuration. All mutation flows through this module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::detect;
use crate::error::{WranglerError, WranglerResult};

/// A single cell. `None` means no value is present; `Some("")` is an
/// explicitly blank value. Serialization collapses both to an empty field.
pub type Cell = Option<String>;

/// One table row, always exactly as wide as the column set.
pub type Row = Vec<Cell>;

/// Advisory per-column classification derived from cell contents. Display
/// metadata only; nothing gates editing or serialization on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Numeric,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
        }
    }
}

/// Delimiter and header settings used by parse and serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: detect::DEFAULT_DELIMITER,
            has_headers: true,
        }
    }
}

/// Value copy of a table's data at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Change notification pushed to observers registered with
/// [`TableModel::on_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    ColumnsReplaced,
    RowsReplaced,
    RowAppended,
    RowsRemoved { count: usize },
    ColumnAppended { index: usize },
    ColumnRemoved { index: usize },
    CellEdited { row: usize, column: usize },
    Sorted { column: usize, ascending: bool },
}

type ChangeListener = Box<dyn Fn(&TableEvent)>;

pub struct TableModel {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Row>,
    original: Snapshot,
    stable: Snapshot,
    config: TableConfig,
    populated: bool,
    listeners: Vec<ChangeListener>,
}

impl TableModel {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            columns: Vec::new(),
            kinds: Vec::new(),
            rows: Vec::new(),
            original: Snapshot::default(),
            stable: Snapshot::default(),
            config,
            populated: false,
            listeners: Vec::new(),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn original(&self) -> &Snapshot {
        &self.original
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub fn set_delimiter(&mut self, delimiter: char) {
        self.config.delimiter = delimiter;
    }

    pub fn set_has_headers(&mut self, has_headers: bool) {
        self.config.has_headers = has_headers;
    }

    /// Registers a change observer. Observers see every mutation event and
    /// are not carried over by [`Clone`].
    pub fn on_change(&mut self, listener: impl Fn(&TableEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the column identifiers and resets the advisory kinds. Row
    /// widths are not adjusted here; pair with [`TableModel::set_rows`] to
    /// establish structural consistency.
    pub fn set_columns(&mut self, names: Vec<String>) {
        self.kinds = vec![ColumnKind::Text; names.len()];
        self.columns = names;
        self.emit(TableEvent::ColumnsReplaced);
    }

    /// Replaces the current rows wholesale. Each incoming row is normalized
    /// to the column count (short rows padded with nulls, long rows
    /// truncated). The first population after construction is also captured
    /// as the original snapshot; every call refreshes the stable snapshot
    /// and re-infers column kinds.
    pub fn set_rows(&mut self, mut rows: Vec<Row>) {
        let width = self.columns.len();
        for row in &mut rows {
            row.resize(width, None);
        }
        self.rows = rows;
        if !self.populated {
            self.populated = true;
            self.original = self.snapshot();
        }
        self.mark_stable();
        self.kinds = infer_kinds(width, &self.rows);
        self.emit(TableEvent::RowsReplaced);
    }

    /// Appends one row, padded with nulls to the column count. A table with
    /// no columns cannot take rows.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) -> WranglerResult<()> {
        if self.columns.is_empty() {
            return Err(WranglerError::validation(
                "cannot add a row to a table with no columns",
            ));
        }
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
        self.mark_stable();
        self.emit(TableEvent::RowAppended);
        Ok(())
    }

    /// Appends one all-null row.
    pub fn push_empty_row(&mut self) -> WranglerResult<()> {
        self.push_row(Vec::new())
    }

    /// Removes the rows at `indices`, highest index first so earlier
    /// removals do not shift later targets; duplicate indices collapse to
    /// one removal. Any index out of range fails the whole call before
    /// anything is removed. A table emptied by deletion gets one fresh null
    /// row back. Returns the number of rows removed.
    pub fn delete_rows(&mut self, indices: &[usize]) -> WranglerResult<usize> {
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= self.rows.len()) {
            return Err(WranglerError::structural(format!(
                "row index {bad} out of range for {} row(s)",
                self.rows.len()
            )));
        }
        let mut ordered = indices.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        for &idx in ordered.iter().rev() {
            self.rows.remove(idx);
        }
        if self.rows.is_empty() {
            self.rows.push(vec![None; self.columns.len()]);
        }
        self.mark_stable();
        self.emit(TableEvent::RowsRemoved {
            count: ordered.len(),
        });
        Ok(ordered.len())
    }

    /// Appends a column, filling the new slot with a null cell in every row
    /// of both the current and original snapshots.
    pub fn add_column(&mut self, name: &str) {
        self.columns.push(name.to_string());
        self.kinds.push(ColumnKind::Text);
        for row in &mut self.rows {
            row.push(None);
        }
        self.original.columns.push(name.to_string());
        for row in &mut self.original.rows {
            row.push(None);
        }
        self.mark_stable();
        self.emit(TableEvent::ColumnAppended {
            index: self.columns.len() - 1,
        });
    }

    /// Removes the column at `index` from the names and from every row of
    /// both the current and original snapshots.
    pub fn remove_column(&mut self, index: usize) -> WranglerResult<()> {
        if index >= self.columns.len() {
            return Err(WranglerError::structural(format!(
                "column index {index} out of range for {} column(s)",
                self.columns.len()
            )));
        }
        self.columns.remove(index);
        self.kinds.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        if index < self.original.columns.len() {
            self.original.columns.remove(index);
            for row in &mut self.original.rows {
                if index < row.len() {
                    row.remove(index);
                }
            }
        }
        self.mark_stable();
        self.emit(TableEvent::ColumnRemoved { index });
        Ok(())
    }

    /// Overwrites one cell.
    pub fn set_value(&mut self, row: usize, column: usize, value: Cell) -> WranglerResult<()> {
        let row_count = self.rows.len();
        let column_count = self.columns.len();
        let slot = self
            .rows
            .get_mut(row)
            .ok_or_else(|| {
                WranglerError::structural(format!(
                    "row index {row} out of range for {row_count} row(s)"
                ))
            })?
            .get_mut(column)
            .ok_or_else(|| {
                WranglerError::structural(format!(
                    "column index {column} out of range for {column_count} column(s)"
                ))
            })?;
        *slot = value;
        self.emit(TableEvent::CellEdited { row, column });
        Ok(())
    }

    /// Stable in-place sort of the current rows by one column. Nulls order
    /// before any value ascending (after it descending); two cells that
    /// both parse as numbers compare by magnitude, anything else compares
    /// as text. The original snapshot is untouched.
    pub fn sort(&mut self, column: usize, ascending: bool) -> WranglerResult<()> {
        if column >= self.columns.len() {
            return Err(WranglerError::structural(format!(
                "column index {column} out of range for {} column(s)",
                self.columns.len()
            )));
        }
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(&a[column], &b[column]);
            if ascending { ord } else { ord.reverse() }
        });
        self.emit(TableEvent::Sorted { column, ascending });
        Ok(())
    }

    /// Index of the first column whose name matches exactly.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of the first column whose name matches ignoring ASCII case.
    pub fn find_column_ci(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Replaces the current data with a deep copy of the original snapshot
    /// and re-infers column kinds.
    pub fn restore_original(&mut self) {
        let snapshot = self.original.clone();
        self.apply_snapshot(snapshot);
    }

    /// Replaces the current data with the last stable snapshot, the restore
    /// point maintained for clearing filters.
    pub fn restore_stable(&mut self) {
        let snapshot = self.stable.clone();
        self.apply_snapshot(snapshot);
    }

    /// Drops every current row failing `keep`. The original and stable
    /// snapshots are untouched, which is what makes a later
    /// [`TableModel::restore_stable`] undo the filter. Returns the kept row
    /// count.
    pub(crate) fn retain_rows(&mut self, mut keep: impl FnMut(&Row) -> bool) -> usize {
        self.rows.retain(|row| keep(row));
        self.kinds = infer_kinds(self.columns.len(), &self.rows);
        self.emit(TableEvent::RowsReplaced);
        self.rows.len()
    }

    /// Serializes the table using its own configuration.
    pub fn to_text(&self) -> String {
        codec::serialize(&self.columns, &self.rows, &self.config)
    }

    /// Frequency of every distinct display value in `column`, sorted by
    /// count descending then value ascending. Null and blank cells both
    /// count under the empty string.
    pub fn count_unique_values(&self, column: usize) -> WranglerResult<Vec<(String, usize)>> {
        if column >= self.columns.len() {
            return Err(WranglerError::structural(format!(
                "column index {column} out of range for {} column(s)",
                self.columns.len()
            )));
        }
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &self.rows {
            let text = row.get(column).map(display_text).unwrap_or("");
            *counts.entry(text.to_string()).or_insert(0) += 1;
        }
        let mut items = counts.into_iter().collect::<Vec<_>>();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(items)
    }

    /// True when any current cell is null or whitespace-only.
    pub fn has_empty_cells(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|cell| cell.as_deref().is_none_or(|text| text.trim().is_empty()))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }

    fn mark_stable(&mut self) {
        self.stable = self.snapshot();
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.kinds = infer_kinds(snapshot.columns.len(), &snapshot.rows);
        self.columns = snapshot.columns;
        self.rows = snapshot.rows;
        self.emit(TableEvent::RowsReplaced);
    }

    fn emit(&self, event: TableEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TableModel {
    /// Duplicates the data, snapshots, and configuration. Change listeners
    /// stay with the source.
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            kinds: self.kinds.clone(),
            rows: self.rows.clone(),
            original: self.original.clone(),
            stable: self.stable.clone(),
            config: self.config,
            populated: self.populated,
            listeners: Vec::new(),
        }
    }
}

/// String representation used for comparisons, filtering, and display:
/// null reads as the empty string.
pub fn display_text(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or("")
}

fn infer_kinds(column_count: usize, rows: &[Row]) -> Vec<ColumnKind> {
    let mut kinds = Vec::with_capacity(column_count);
    for column in 0..column_count {
        let mut numeric = false;
        for row in rows {
            let Some(cell) = row.get(column) else {
                continue;
            };
            let text = display_text(cell);
            if text.is_empty() {
                continue;
            }
            if parse_number(text).is_some() {
                numeric = true;
            } else {
                numeric = false;
                break;
            }
        }
        kinds.push(if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        });
    }
    kinds
}

fn compare_cells(a: &Cell, b: &Cell) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (parse_number(left), parse_number(right)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => left.cmp(right),
        },
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn cell(text: &str) -> Cell {
        Some(text.to_string())
    }

    #[test]
    fn compare_orders_null_before_values() {
        assert_eq!(compare_cells(&None, &None), Ordering::Equal);
        assert_eq!(compare_cells(&None, &cell("a")), Ordering::Less);
        assert_eq!(compare_cells(&cell("a"), &None), Ordering::Greater);
    }

    #[test]
    fn compare_is_numeric_when_both_sides_parse() {
        assert_eq!(compare_cells(&cell("2"), &cell("10")), Ordering::Less);
        assert_eq!(compare_cells(&cell(" 2 "), &cell("10")), Ordering::Less);
        // Lexicographic fallback when either side is not a number.
        assert_eq!(compare_cells(&cell("2"), &cell("10x")), Ordering::Greater);
    }

    #[test]
    fn infer_requires_every_populated_cell_to_parse() {
        let rows = vec![
            vec![cell("1"), cell("a"), None],
            vec![cell("2.5"), cell("3"), cell("")],
        ];
        assert_eq!(
            infer_kinds(3, &rows),
            vec![ColumnKind::Numeric, ColumnKind::Text, ColumnKind::Text]
        );
    }

    #[test]
    fn infer_tags_all_empty_columns_as_text() {
        let rows = vec![vec![None], vec![cell("")]];
        assert_eq!(infer_kinds(1, &rows), vec![ColumnKind::Text]);
    }

    #[test]
    fn empty_cell_scan_spots_null_blank_and_whitespace() {
        let mut model = TableModel::new();
        model.set_columns(vec!["a".into(), "b".into()]);
        model.set_rows(vec![vec![cell("x"), cell("y")]]);
        assert!(!model.has_empty_cells());
        model.set_value(0, 1, cell("   ")).unwrap();
        assert!(model.has_empty_cells());
        model.set_value(0, 1, None).unwrap();
        assert!(model.has_empty_cells());
    }

    #[test]
    fn unique_value_counts_sort_by_count_then_value() {
        let mut model = TableModel::new();
        model.set_columns(vec!["status".into()]);
        model.set_rows(vec![
            vec![cell("open")],
            vec![cell("closed")],
            vec![cell("open")],
            vec![None],
        ]);
        let counts = model.count_unique_values(0).unwrap();
        assert_eq!(
            counts,
            vec![
                ("open".to_string(), 2),
                (String::new(), 1),
                ("closed".to_string(), 1),
            ]
        );
    }
}
