use camino::{Utf8Path, Utf8PathBuf};
use rental_core::{SqliteDocumentStore, StoreConfig};
use rental_data::{ImportRequest, RentalInventory};
use tempfile::TempDir;

/// Record files shipped with the tests.
const FIXTURE_FILES: [&str; 3] = ["products.csv", "customers.csv", "rentals.csv"];

/// Directory containing the CSV fixtures.
fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Scratch directory holding copies of the fixtures and the database.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Empty scratch directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Path of the scratch directory.
    pub fn root(&self) -> &Utf8Path {
        Utf8Path::from_path(self.dir.path()).expect("utf-8 temp dir")
    }

    /// Copy every fixture file into the workspace.
    pub fn copy_fixtures(&self) {
        for name in FIXTURE_FILES {
            let source = fixtures_dir().join(name);
            std::fs::copy(source.as_std_path(), self.root().join(name).as_std_path())
                .unwrap_or_else(|err| panic!("failed to copy fixture {source}: {err}"));
        }
    }

    /// Delete `name` from the workspace.
    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.root().join(name).as_std_path())
            .unwrap_or_else(|err| panic!("failed to remove {name}: {err}"));
    }

    /// Request for the three fixture files in this workspace.
    pub fn request(&self) -> ImportRequest {
        ImportRequest::new(self.root(), FIXTURE_FILES[0], FIXTURE_FILES[1], FIXTURE_FILES[2])
    }

    /// Inventory over a database inside this workspace.
    pub fn inventory(&self) -> RentalInventory<SqliteDocumentStore> {
        let config = StoreConfig::new(self.root().join("store/media.db"));
        RentalInventory::new(SqliteDocumentStore::new(config))
    }
}
