//! CSV record-set reader.

use camino::{Utf8Path, Utf8PathBuf};
use rental_core::{Record, timed};
use thiserror::Error;

/// Errors raised while reading a record file.
#[derive(Debug, Error)]
pub enum RecordReadError {
    /// The file does not exist.
    #[error("record file {path} not found")]
    NotFound {
        /// Missing file.
        path: Utf8PathBuf,
    },
    /// The file exists but could not be opened.
    #[error("failed to open record file {path}")]
    Open {
        /// File being opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not well-formed CSV, or a row's width differs from the
    /// header's.
    #[error("failed to parse record file {path}")]
    Parse {
        /// File being parsed.
        path: Utf8PathBuf,
        /// Source error produced by `csv`.
        #[source]
        source: csv::Error,
    },
}

/// Read every data row of a CSV file as a [`Record`].
///
/// The header row supplies the field names. Values are kept verbatim and
/// rows are returned in file order. An empty file, or one holding only a
/// header, yields no records.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use rental_data::read_records;
///
/// # fn main() -> Result<(), rental_data::RecordReadError> {
/// let products = read_records(Utf8Path::new("data/products.csv"))?;
/// println!("read {} products", products.len());
/// # Ok(())
/// # }
/// ```
pub fn read_records(path: &Utf8Path) -> Result<Vec<Record>, RecordReadError> {
    timed("read_records", || read_csv(path)).into_inner()
}

fn read_csv(path: &Utf8Path) -> Result<Vec<Record>, RecordReadError> {
    let file = rental_fs::open_utf8_file(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RecordReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            RecordReadError::Open {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let parse_error = |source: csv::Error| RecordReadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers().map_err(parse_error)?.clone();
    reader
        .records()
        .map(|row| {
            let fields = row.map_err(parse_error)?;
            let record: Record = headers.iter().zip(fields.iter()).collect();
            Ok(record)
        })
        .collect()
}
