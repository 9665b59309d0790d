use crate::error::{WranglerError, WranglerResult};
use crate::model::{TableModel, display_text};

/// Row predicate operators, parsed from their command/UI spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Contains,
    Equals,
    StartsWith,
}

impl FilterOp {
    /// Case-insensitive token lookup. An unknown token yields `None`, which
    /// [`apply`] treats as a predicate matching nothing, not as an error.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("contains") {
            Some(FilterOp::Contains)
        } else if token.eq_ignore_ascii_case("equals") {
            Some(FilterOp::Equals)
        } else if token.eq_ignore_ascii_case("starts-with") {
            Some(FilterOp::StartsWith)
        } else {
            None
        }
    }

    /// Tests one cell's display text against the needle. Matching is
    /// case-sensitive.
    pub fn matches(self, cell_text: &str, needle: &str) -> bool {
        match self {
            FilterOp::Contains => cell_text.contains(needle),
            FilterOp::Equals => cell_text == needle,
            FilterOp::StartsWith => cell_text.starts_with(needle),
        }
    }
}

/// Applies a single-column predicate to the model's current rows, dropping
/// every row that fails it. Validation happens before any row is touched;
/// the original and stable snapshots stay as they are, which is what lets
/// [`clear`] undo the filter. Returns the kept row count.
pub fn apply(
    model: &mut TableModel,
    column_name: &str,
    operator_token: &str,
    value: &str,
) -> WranglerResult<usize> {
    if column_name.trim().is_empty() {
        return Err(WranglerError::validation("choose a column to filter on"));
    }
    if value.is_empty() {
        return Err(WranglerError::validation("filter value must not be empty"));
    }
    let Some(column) = model.find_column(column_name) else {
        return Err(WranglerError::validation(format!(
            "column '{column_name}' not found"
        )));
    };
    let op = FilterOp::parse(operator_token);
    let kept = model.retain_rows(|row| {
        let text = row.get(column).map(display_text).unwrap_or("");
        op.is_some_and(|op| op.matches(text, value))
    });
    Ok(kept)
}

/// Undoes filtering by restoring the model's last stable snapshot.
pub fn clear(model: &mut TableModel) {
    model.restore_stable();
}
