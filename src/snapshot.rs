use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::util::{ensure_directory, local_column_string, local_compact_string};

/// Extra column appended to every snapshot row.
pub const CAPTURED_AT_COLUMN: &str = "capturedAt";

/// Writes an immutable, timestamp-named copy of the ledger at `ledger_path`
/// into the configured log directory and returns the new file's path.
///
/// Rows are copied verbatim (placeholder descriptions stay collapsed) with
/// one trailing `capturedAt` column; blank rows are dropped, the original
/// header set and order are preserved. The source ledger is never touched.
/// A missing source ledger fails with `Error::LedgerNotFound` before any
/// output is created. Same-second snapshots never overwrite each other: the
/// filename gets a numeric suffix instead.
pub fn record_snapshot(ledger_path: &Path, settings: &Settings) -> Result<PathBuf> {
    if !ledger_path.exists() {
        return Err(Error::LedgerNotFound(ledger_path.to_path_buf()));
    }

    ensure_directory(&settings.log_directory)?;

    let now = Local::now();
    let out_path = available_snapshot_path(&settings.log_directory, &local_compact_string(now));
    let captured_at = local_column_string(now);

    let read_err = |source: csv::Error| Error::Csv {
        path: ledger_path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(ledger_path)
        .map_err(read_err)?;
    let mut headers: Vec<String> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(str::to_string)
        .collect();
    headers.push(CAPTURED_AT_COLUMN.to_string());

    let write_err = |err: csv::Error| {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            other => io::Error::other(format!("{other:?}")),
        };
        Error::Write {
            path: out_path.clone(),
            source,
        }
    };

    let tmp_path = out_path.with_extension("csv.tmp");
    let result = (|| {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&tmp_path)
            .map_err(write_err)?;
        writer.write_record(&headers).map_err(write_err)?;

        for row in reader.records() {
            let row = row.map_err(read_err)?;
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let mut out_row: Vec<&str> = row.iter().collect();
            out_row.push(&captured_at);
            writer.write_record(&out_row).map_err(write_err)?;
        }

        writer.flush().map_err(|source| Error::Write {
            path: out_path.clone(),
            source,
        })
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, &out_path).map_err(|source| Error::Write {
        path: out_path.clone(),
        source,
    })?;

    Ok(out_path)
}

/// First free `snapshot_<ts>.csv` name, disambiguated with `_2`, `_3`, ...
/// when snapshots land within the same second.
fn available_snapshot_path(log_directory: &Path, timestamp: &str) -> PathBuf {
    let candidate = log_directory.join(format!("snapshot_{timestamp}.csv"));
    if !candidate.exists() {
        return candidate;
    }

    let mut n = 2u32;
    loop {
        let candidate = log_directory.join(format!("snapshot_{timestamp}_{n}.csv"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEDGER: &str = "name,title,imageRef,description,quantity,price\n\
                          Cat,Cat,img.png,DEFAULT,2,1.50\n\
                          ,,,,,\n\
                          Dog,Dog,,plain text,1,3.00\n";

    fn setup(dir: &TempDir) -> (PathBuf, Settings) {
        let settings = Settings::defaults(dir.path());
        let ledger_path = settings.active_ledger_path.clone();
        fs::write(&ledger_path, LEDGER).unwrap();
        (ledger_path, settings)
    }

    #[test]
    fn snapshot_copies_rows_with_captured_at_column() {
        let dir = TempDir::new().unwrap();
        let (ledger_path, settings) = setup(&dir);

        let out_path = record_snapshot(&ledger_path, &settings).unwrap();

        let content = fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3, "header plus two non-blank rows");
        assert_eq!(
            lines[0],
            "name,title,imageRef,description,quantity,price,capturedAt"
        );
        // rows are copied verbatim: the placeholder stays collapsed
        assert!(lines[1].starts_with("Cat,Cat,img.png,DEFAULT,2,1.50,"));
        assert!(lines[2].starts_with("Dog,Dog,,plain text,1,3.00,"));

        // both rows carry the same capture timestamp
        let ts1 = lines[1].rsplit(',').next().unwrap();
        let ts2 = lines[2].rsplit(',').next().unwrap();
        assert_eq!(ts1, ts2);
        assert_eq!(ts1.len(), "2025-11-06 15:30:45".len());
    }

    #[test]
    fn snapshot_does_not_mutate_source_ledger() {
        let dir = TempDir::new().unwrap();
        let (ledger_path, settings) = setup(&dir);

        record_snapshot(&ledger_path, &settings).unwrap();

        assert_eq!(fs::read_to_string(&ledger_path).unwrap(), LEDGER);
    }

    #[test]
    fn same_second_snapshots_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let (ledger_path, settings) = setup(&dir);

        let first = record_snapshot(&ledger_path, &settings).unwrap();
        let second = record_snapshot(&ledger_path, &settings).unwrap();
        let third = record_snapshot(&ledger_path, &settings).unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(first.exists() && second.exists() && third.exists());
    }

    #[test]
    fn missing_ledger_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::defaults(dir.path());
        let missing = dir.path().join("nope.csv");

        let err = record_snapshot(&missing, &settings).unwrap_err();
        assert!(matches!(err, Error::LedgerNotFound(path) if path == missing));

        // nothing was created, not even the log directory
        assert!(!settings.log_directory.exists());
    }
}
