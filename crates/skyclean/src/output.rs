//! Delimited-text and JSON export.
//!
//! Every file is first written to a `<name>.partial` sibling and only
//! renamed over its target on [`StagedFile::commit`], so a failed export
//! leaves neither a partial file nor a stale staging file behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CleanError, Result};
use crate::table::Table;

/// A completely written file waiting to be moved onto its target path.
#[derive(Debug)]
#[must_use = "a staged file is neither published nor removed until committed or discarded"]
pub struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staging file onto the target. The staging file is removed
    /// if the rename fails.
    pub fn commit(self) -> Result<()> {
        if let Err(source) = fs::rename(&self.staging, &self.target) {
            let _ = fs::remove_file(&self.staging);
            return Err(CleanError::Io {
                path: self.target,
                source,
            });
        }
        debug!(path = %self.target.display(), "staged file committed");
        Ok(())
    }

    /// Drop the staging file without touching the target.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.staging);
    }
}

/// Write `table` to `path` with a header row.
///
/// Missing cells become empty fields.
pub fn write_table(table: &Table, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    stage_table(table, path, delimiter)?.commit()?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "cleaned table exported"
    );
    Ok(())
}

/// Write `table` to the staging sibling of `path`.
pub fn stage_table(table: &Table, path: impl AsRef<Path>, delimiter: u8) -> Result<StagedFile> {
    stage(path.as_ref(), |file| write_rows(table, file, delimiter))
}

/// Serialize `value` as pretty JSON to the staging sibling of `path`.
pub fn stage_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<StagedFile> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let path = path.as_ref();
    stage(path, |file| {
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .map_err(io_err(path))
    })
}

fn stage(path: &Path, write: impl FnOnce(File) -> Result<()>) -> Result<StagedFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let staged = StagedFile {
        staging: staging_path(path),
        target: path.to_path_buf(),
    };
    let file = File::create(&staged.staging).map_err(io_err(&staged.staging))?;

    match write(file) {
        Ok(()) => Ok(staged),
        Err(e) => {
            staged.discard();
            Err(e)
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> CleanError + use<> {
    let path = path.to_path_buf();
    move |source| CleanError::Io { path, source }
}

fn write_rows(table: &Table, file: File, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
