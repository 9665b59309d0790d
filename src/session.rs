//! Session controller: sequences the open/save/new/filter/add-row/delete-row
//! lifecycle over one live table and enforces the unsaved-changes policy at
//! every table-discarding operation. Presentation code supplies a
//! [`Frontend`]; the core answers with [`Status`] values and never renders
//! anything itself.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::codec;
use crate::detect;
use crate::error::{WranglerError, WranglerResult};
use crate::filter;
use crate::model::{TableConfig, TableModel};
use crate::printable_delimiter;

/// Answer to the unsaved-changes question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    /// Save first, then continue with the pending operation.
    Save,
    /// Continue without saving.
    Discard,
    /// Keep the current table; the pending operation is cancelled.
    Abort,
}

/// Prompt surface the presentation layer provides to the session.
pub trait Frontend {
    /// Three-way unsaved-changes confirmation.
    fn confirm_save(&mut self) -> SaveDecision;
    /// Path to open; `None` when the user cancels.
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    /// Path to save to; `None` when the user cancels.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
    /// Free-text question with a prefilled default; `None` when cancelled.
    fn prompt_text(&mut self, prompt: &str, default: &str) -> Option<String>;
}

/// Frontend that declines every prompt. Suits one-shot embedding where no
/// interactive question should ever be asked; the command-line binary runs
/// on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFrontend;

impl Frontend for HeadlessFrontend {
    fn confirm_save(&mut self) -> SaveDecision {
        SaveDecision::Abort
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        None
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        None
    }

    fn prompt_text(&mut self, _prompt: &str, _default: &str) -> Option<String> {
        None
    }
}

/// Outcome of a session operation: a human-readable message plus the
/// resulting row and column counts for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub rows: usize,
    pub columns: usize,
}

/// File-opening knobs. A `None` delimiter means auto-detect.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    pub delimiter: Option<char>,
    pub has_headers: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: true,
        }
    }
}

pub struct Session {
    model: TableModel,
    path: Option<PathBuf>,
    frontend: Box<dyn Frontend>,
    live: bool,
}

impl Session {
    pub fn new(frontend: Box<dyn Frontend>) -> Self {
        Self {
            model: TableModel::new(),
            path: None,
            frontend,
            live: false,
        }
    }

    pub fn headless() -> Self {
        Self::new(Box::new(HeadlessFrontend))
    }

    pub fn table(&self) -> &TableModel {
        &self.model
    }

    pub fn table_mut(&mut self) -> &mut TableModel {
        &mut self.model
    }

    pub fn bound_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_table(&self) -> bool {
        self.live
    }

    /// Replaces the session's table with a fresh one of the given columns
    /// plus one empty row. The caller assembles the name list; an empty one
    /// means name entry was cancelled before the first name. `Ok(None)`
    /// when the unsaved-changes guard aborts.
    pub fn new_table(&mut self, names: Vec<String>) -> WranglerResult<Option<Status>> {
        if names.is_empty() {
            return Err(WranglerError::validation(
                "a new table needs at least one column name",
            ));
        }
        if !self.confirm_discard()? {
            return Ok(None);
        }
        let mut model = TableModel::new();
        model.set_columns(names);
        model.set_rows(Vec::new());
        model.push_empty_row()?;
        self.model = model;
        self.path = None;
        self.live = true;
        info!(
            "Created new table with {} column(s)",
            self.model.column_count()
        );
        Ok(Some(self.status("Created new table")))
    }

    /// Interactive open: guard, ask the frontend for a path, load with an
    /// auto-detected delimiter. `Ok(None)` when either prompt is cancelled.
    pub fn open(&mut self) -> WranglerResult<Option<Status>> {
        if !self.confirm_discard()? {
            return Ok(None);
        }
        let Some(path) = self.frontend.pick_open_path() else {
            return Ok(None);
        };
        self.load(&path, OpenOptions::default()).map(Some)
    }

    /// Opens `path` directly. The unsaved-changes guard still applies while
    /// a table is live; `Ok(None)` when it aborts.
    pub fn open_path(
        &mut self,
        path: &Path,
        options: OpenOptions,
    ) -> WranglerResult<Option<Status>> {
        if !self.confirm_discard()? {
            return Ok(None);
        }
        self.load(path, options).map(Some)
    }

    /// Saves to the bound path, falling through to the interactive save-as
    /// flow when none is bound yet.
    pub fn save(&mut self) -> WranglerResult<Option<Status>> {
        match self.path.clone() {
            Some(path) => self.write(&path, None).map(Some),
            None => self.save_as(),
        }
    }

    /// Interactive save-as: asks for a delimiter, then for a path. A
    /// cancelled or empty delimiter answer keeps the current one, and only
    /// the first character of a longer answer counts. `Ok(None)` when the
    /// path prompt is cancelled.
    pub fn save_as(&mut self) -> WranglerResult<Option<Status>> {
        let current = self.model.config().delimiter.to_string();
        let delimiter = self
            .frontend
            .prompt_text("Field delimiter", &current)
            .and_then(|answer| answer.chars().next());
        let Some(path) = self.frontend.pick_save_path() else {
            return Ok(None);
        };
        self.write(&path, delimiter).map(Some)
    }

    /// Saves to an explicit path, optionally switching the delimiter.
    pub fn save_to(&mut self, path: &Path, delimiter: Option<char>) -> WranglerResult<Status> {
        self.write(path, delimiter)
    }

    /// Appends one empty row to the live table.
    pub fn add_row(&mut self) -> WranglerResult<Status> {
        self.model.push_empty_row()?;
        Ok(self.status("Added row"))
    }

    /// Deletes the given row indices. Ordering and duplicates are the
    /// model's business; an empty selection is the caller's mistake.
    pub fn delete_rows(&mut self, indices: &[usize]) -> WranglerResult<Status> {
        if indices.is_empty() {
            return Err(WranglerError::validation("no rows selected for deletion"));
        }
        let removed = self.model.delete_rows(indices)?;
        Ok(self.status(format!("Deleted {removed} row(s)")))
    }

    /// Drops current rows failing a single-column predicate.
    pub fn filter(&mut self, column: &str, operator: &str, value: &str) -> WranglerResult<Status> {
        let kept = filter::apply(&mut self.model, column, operator, value)?;
        Ok(self.status(format!("Filter kept {kept} row(s)")))
    }

    /// Restores the last stable (pre-filter) row set.
    pub fn clear_filter(&mut self) -> WranglerResult<Status> {
        filter::clear(&mut self.model);
        Ok(self.status("Filters cleared"))
    }

    /// Discards the table once the guard passes. `Ok(None)` on abort.
    pub fn close(&mut self) -> WranglerResult<Option<Status>> {
        if !self.confirm_discard()? {
            return Ok(None);
        }
        self.model = TableModel::new();
        self.path = None;
        self.live = false;
        Ok(Some(self.status("Closed table")))
    }

    /// Unsaved-changes guard. False means the pending operation must not
    /// proceed. A `Save` answer whose save-as flow gets cancelled blocks
    /// too: an unanswered prompt never discards anything.
    fn confirm_discard(&mut self) -> WranglerResult<bool> {
        if !self.live {
            return Ok(true);
        }
        match self.frontend.confirm_save() {
            SaveDecision::Save => Ok(self.save()?.is_some()),
            SaveDecision::Discard => {
                debug!("Discarding table without saving");
                Ok(true)
            }
            SaveDecision::Abort => Ok(false),
        }
    }

    fn load(&mut self, path: &Path, options: OpenOptions) -> WranglerResult<Status> {
        let content = codec::read_file_text(path)?;
        let delimiter = options
            .delimiter
            .unwrap_or_else(|| detect::sniff(&content));
        let config = TableConfig {
            delimiter,
            has_headers: options.has_headers,
        };
        let parsed = codec::parse(&content, &config);
        if parsed.is_empty() {
            return Err(WranglerError::validation(format!(
                "{} contains no data",
                path.display()
            )));
        }
        let mut model = TableModel::with_config(config);
        model.set_columns(parsed.columns);
        model.set_rows(parsed.rows);
        self.model = model;
        self.path = Some(path.to_path_buf());
        self.live = true;
        info!(
            "Loaded {} with delimiter '{}': {} row(s), {} column(s)",
            path.display(),
            printable_delimiter(delimiter),
            self.model.row_count(),
            self.model.column_count()
        );
        Ok(self.status(format!("Loaded {}", path.display())))
    }

    /// Serializes with the requested delimiter and writes. The delimiter
    /// and the bound path stick to the session only after the write
    /// succeeds.
    fn write(&mut self, path: &Path, delimiter: Option<char>) -> WranglerResult<Status> {
        let mut config = self.model.config();
        if let Some(delimiter) = delimiter {
            config.delimiter = delimiter;
        }
        let text = codec::serialize(self.model.column_names(), self.model.rows(), &config);
        codec::write_file(path, &text)?;
        self.model.set_delimiter(config.delimiter);
        self.path = Some(path.to_path_buf());
        info!(
            "Saved {}: {} row(s), {} column(s)",
            path.display(),
            self.model.row_count(),
            self.model.column_count()
        );
        Ok(self.status(format!("Saved {}", path.display())))
    }

    fn status(&self, message: impl Into<String>) -> Status {
        Status {
            message: message.into(),
            rows: self.model.row_count(),
            columns: self.model.column_count(),
        }
    }
}
