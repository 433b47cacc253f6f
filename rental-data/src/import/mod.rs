//! Bulk import of the three record files into their collections.

use camino::Utf8PathBuf;
use log::warn;
use rental_core::{DocumentStore, KindCounts, RecordKind};

use crate::records::{RecordReadError, read_records};

/// Location of the three files making up one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    directory: Utf8PathBuf,
    product_file: String,
    customer_file: String,
    rental_file: String,
}

impl ImportRequest {
    /// Files named relative to `directory`. An empty directory leaves the
    /// file names as given.
    #[must_use]
    pub fn new(
        directory: impl Into<Utf8PathBuf>,
        product_file: impl Into<String>,
        customer_file: impl Into<String>,
        rental_file: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            product_file: product_file.into(),
            customer_file: customer_file.into(),
            rental_file: rental_file.into(),
        }
    }

    /// Full path of the file holding records of `kind`.
    #[must_use]
    pub fn path(&self, kind: RecordKind) -> Utf8PathBuf {
        let file = match kind {
            RecordKind::Product => &self.product_file,
            RecordKind::Customer => &self.customer_file,
            RecordKind::Rental => &self.rental_file,
        };
        self.directory.join(file)
    }
}

/// A record file that could not be imported.
#[derive(Debug)]
pub struct KindFailure {
    /// Kind whose file failed.
    pub kind: RecordKind,
    /// Why it failed.
    pub error: RecordReadError,
}

/// Outcome of an import: what was added and what failed, per kind.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Records read and inserted, per kind.
    pub added: KindCounts,
    /// File-level failures, per kind (zero or one each).
    pub errors: KindCounts,
    /// The failures behind `errors`, in kind order.
    pub failures: Vec<KindFailure>,
}

impl ImportReport {
    /// `(added, errors)`, each ordered `(products, customers, rentals)`.
    #[must_use]
    pub const fn as_tuples(&self) -> ((usize, usize, usize), (usize, usize, usize)) {
        (self.added.as_tuple(), self.errors.as_tuple())
    }

    /// Whether every file was read.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read each record file and append its rows to the matching collection.
///
/// Kinds are handled independently, in `(products, customers, rentals)`
/// order. A file that cannot be read counts as one error for its kind and the
/// remaining kinds still load. The added count is the number of rows read;
/// existing records are never replaced, so importing the same files twice
/// stores every row twice.
///
/// # Errors
///
/// Store failures abort the import and are returned as-is.
pub fn import_records<S>(store: &mut S, request: &ImportRequest) -> Result<ImportReport, S::Error>
where
    S: DocumentStore,
{
    let mut report = ImportReport::default();
    for kind in RecordKind::ALL {
        let path = request.path(kind);
        match read_records(&path) {
            Ok(records) => {
                if !records.is_empty() {
                    store.insert_many(kind, &records)?;
                }
                report.added[kind] = records.len();
            }
            Err(error) => {
                warn!("skipping {kind} import: {error}");
                report.errors[kind] = 1;
                report.failures.push(KindFailure { kind, error });
            }
        }
    }
    Ok(report)
}
