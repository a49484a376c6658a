// src/export.rs

use std::fs;
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use crate::error::OutputError;
use crate::record::{HEADER, ProductRecord};

const DELIMITER: u8 = b',';

/// Makes sure `dir` exists as a directory, creating missing ancestors.
///
/// An empty path stands for the working directory. If any existing component
/// of the path is a regular file the directory can never be created, which is
/// reported as [`OutputError::PathConflict`] rather than an I/O error.
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf, OutputError> {
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    };

    if let Some(blocker) = dir.ancestors().find(|p| p.exists() && !p.is_dir()) {
        return Err(OutputError::PathConflict(blocker.to_path_buf()));
    }

    fs::create_dir_all(&dir).map_err(|source| OutputError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// File name (without extension) for a category's output file.
pub fn file_stem(category: &str) -> String {
    category.replace(['/', '\\'], "_")
}

/// Writes `records` to `<dir>/<stem>.csv` under the fixed header.
///
/// Rows go to a temporary file in `dir` that replaces the destination only
/// once everything is flushed, so an interrupted run never leaves a truncated
/// file behind.
pub fn write_records(
    dir: &Path,
    stem: &str,
    records: &[ProductRecord],
) -> Result<PathBuf, OutputError> {
    let path = dir.join(format!("{stem}.csv"));
    let io_error = |source| OutputError::Io {
        path: path.clone(),
        source,
    };
    let csv_error = |source| OutputError::Csv {
        path: path.clone(),
        source,
    };

    let mut staging = NamedTempFile::new_in(dir).map_err(io_error)?;
    {
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(staging.as_file_mut());
        writer.write_record(HEADER).map_err(csv_error)?;
        for record in records {
            writer.serialize(record).map_err(csv_error)?;
        }
        writer.flush().map_err(io_error)?;
    }
    staging.as_file_mut().sync_all().map_err(io_error)?;
    staging.persist(&path).map_err(|e| io_error(e.error))?;

    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(path)
}
