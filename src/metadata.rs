use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{WranglerError, WranglerResult};
use crate::model::{ColumnKind, TableModel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
}

/// Serializable description of a table: configuration plus the column names
/// and their advisory kinds. Written by `describe --meta`, loadable for
/// toolchains that want the shape without the data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableMeta {
    pub delimiter: char,
    pub has_headers: bool,
    pub row_count: usize,
    pub columns: Vec<ColumnMeta>,
}

impl TableMeta {
    pub fn from_model(model: &TableModel) -> Self {
        let columns = model
            .column_names()
            .iter()
            .zip(model.column_kinds())
            .map(|(name, kind)| ColumnMeta {
                name: name.clone(),
                kind: *kind,
            })
            .collect();
        let config = model.config();
        TableMeta {
            delimiter: config.delimiter,
            has_headers: config.has_headers,
            row_count: model.row_count(),
            columns,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn save(&self, path: &Path) -> WranglerResult<()> {
        let file = File::create(path).map_err(|source| WranglerError::io(path, source))?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|err| WranglerError::validation(format!("writing metadata JSON: {err}")))
    }

    pub fn load(path: &Path) -> WranglerResult<Self> {
        let file = File::open(path).map_err(|source| WranglerError::io(path, source))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|err| WranglerError::validation(format!("parsing metadata JSON: {err}")))
    }
}
