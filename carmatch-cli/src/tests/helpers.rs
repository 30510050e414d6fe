//! Test helpers for laying out catalogs and preference tables on disk.

use camino::{Utf8Path, Utf8PathBuf};
use carmatch_core::test_support::sample_cars;
use carmatch_core::{PersonaKey, PreferenceTable};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary working directory holding the sample catalog.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let catalog = serde_json::to_vec_pretty(&sample_cars()).expect("serialize catalog");
        write_utf8(&root.join("carDB.json"), &catalog);
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn catalog(&self) -> Utf8PathBuf {
        self.root.join("carDB.json")
    }

    pub(super) fn preferences(&self) -> Utf8PathBuf {
        self.root.join("qTable.json")
    }

    pub(super) fn preferences_db(&self) -> Utf8PathBuf {
        self.root.join("qTable.sqlite")
    }

    /// Occupy the JSON store's staging path with a directory so every flush
    /// fails.
    pub(super) fn block_preference_writes(&self) {
        let staging = self.root.join("qTable.json.partial");
        std::fs::create_dir(staging.as_std_path()).expect("create staging directory");
    }

    /// Read the JSON preference table back from disk.
    pub(super) fn stored_table(&self) -> PreferenceTable {
        let raw =
            std::fs::read_to_string(self.preferences().as_std_path()).expect("read preferences");
        serde_json::from_str(&raw).expect("decode preferences")
    }

    pub(super) fn stored_value(&self, key: &PersonaKey, car: &str) -> Option<f64> {
        self.stored_table().get(key, car)
    }
}
