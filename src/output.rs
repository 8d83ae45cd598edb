use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::diagnostics::PrepWarning;
use crate::error::PrepError;
use crate::prep::{PREP_COLUMNS, PrepTable, Preparations};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrepSummary {
    pub run_id: String,
    pub tables: Vec<TableSummary>,
    pub warnings: Vec<PrepWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub samples: usize,
    pub path: Option<String>,
}

impl PrepSummary {
    pub fn new(run_id: &str, preparations: &Preparations, written: &[Utf8PathBuf]) -> Self {
        let tables = preparations
            .tables
            .iter()
            .map(|(name, table)| TableSummary {
                name: name.clone(),
                samples: table.len(),
                path: written
                    .iter()
                    .find(|path| path.file_stem() == Some(name.as_str()))
                    .map(|path| path.to_string()),
            })
            .collect();
        Self {
            run_id: run_id.to_string(),
            tables,
            warnings: preparations.warnings.clone(),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &PrepSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Serializes a table as tab-separated text; the header is written even when empty.
pub fn write_table<W: Write>(table: &PrepTable, writer: W) -> Result<(), PrepError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(PREP_COLUMNS)
        .map_err(|err| PrepError::Filesystem(err.to_string()))?;
    for row in &table.rows {
        wtr.write_record(row.values())
            .map_err(|err| PrepError::Filesystem(err.to_string()))?;
    }
    wtr.flush()
        .map_err(|err| PrepError::Filesystem(err.to_string()))?;
    Ok(())
}

/// Writes every table to `<dir>/<name>.tsv`, replacing existing files atomically.
pub fn write_preparations(
    dir: &Utf8Path,
    preparations: &Preparations,
) -> Result<Vec<Utf8PathBuf>, PrepError> {
    fs::create_dir_all(dir.as_std_path()).map_err(|err| PrepError::Filesystem(err.to_string()))?;

    let mut written = Vec::with_capacity(preparations.tables.len());
    for (name, table) in &preparations.tables {
        let dest = dir.join(format!("{name}.tsv"));
        let mut temp = tempfile::Builder::new()
            .prefix("kira-prep")
            .tempfile_in(dir.as_std_path())
            .map_err(|err| PrepError::Filesystem(err.to_string()))?;
        write_table(table, temp.as_file_mut())?;
        temp.persist(dest.as_std_path())
            .map_err(|err| PrepError::Filesystem(err.to_string()))?;
        tracing::debug!(path = %dest, samples = table.len(), "wrote preparation");
        written.push(dest);
    }
    Ok(written)
}
