use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{Error, Result};

/// Compact local timestamp used in snapshot filenames.
pub fn local_compact_string(ts: DateTime<Local>) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}

/// Human-readable local timestamp used in the snapshot `capturedAt` column.
pub fn local_column_string(ts: DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON with a trailing newline.
///
/// Key order follows the struct's field order, so repeated saves of the same
/// value are byte-identical.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let write_err = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let data = serde_json::to_vec_pretty(value).map_err(|err| write_err(io::Error::other(err)))?;

    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(&data).map_err(write_err)?;
    file.write_all(b"\n").map_err(write_err)?;

    Ok(())
}
