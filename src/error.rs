use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure conditions that callers need to tell apart.
///
/// Malformed row data is not represented here: bad quantity/price text
/// degrades to zero values during parsing and never becomes an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ledger not found: {}", .0.display())]
    LedgerNotFound(PathBuf),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed csv in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
