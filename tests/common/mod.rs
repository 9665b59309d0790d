#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_wrangler::model::{Row, TableModel};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Reads a file previously written under the workspace.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("read temp file")
    }
}

/// Builds a row of non-null cells from string literals.
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|cell| Some((*cell).to_string())).collect()
}

/// Three-column sample table shared across the integration suites.
pub fn sample_model() -> TableModel {
    let mut model = TableModel::new();
    model.set_columns(vec!["id".into(), "name".into(), "amount".into()]);
    model.set_rows(vec![
        row(&["1", "Alice", "42.5"]),
        row(&["2", "Bob", "13.37"]),
        row(&["3", "Alicia", "7.25"]),
    ]);
    model
}

pub fn sample_csv() -> &'static str {
    "id,name,amount\n1,Alice,42.5\n2,Bob,13.37\n3,Alicia,7.25\n"
}
