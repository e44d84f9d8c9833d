//! Catalog test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use catalog_bump::catalog::UpdateRequest;

pub const FIXTURE: &str = include_str!("../fixtures/libs.versions.toml");

/// A catalog file inside a temporary directory
pub struct TestCatalog {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestCatalog {
    /// Copy of the fixture catalog
    pub fn fixture() -> Self {
        Self::with_content(FIXTURE)
    }

    pub fn with_content(content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("libs.versions.toml");
        fs::write(&path, content).unwrap();
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn ref_request(&self, name: &str, version: Option<&str>) -> UpdateRequest {
        UpdateRequest {
            ref_name: Some(name.to_string()),
            ..self.request(version)
        }
    }

    pub fn library_request(&self, name: &str, version: Option<&str>) -> UpdateRequest {
        UpdateRequest {
            library: Some(name.to_string()),
            ..self.request(version)
        }
    }

    pub fn plugin_request(&self, name: &str, version: Option<&str>) -> UpdateRequest {
        UpdateRequest {
            plugin: Some(name.to_string()),
            ..self.request(version)
        }
    }

    fn request(&self, version: Option<&str>) -> UpdateRequest {
        UpdateRequest {
            version: version.map(str::to_string),
            catalog: Some(self.path.clone()),
            ..Default::default()
        }
    }
}

/// Lines of `after` that differ from `before`, assuming the line count is unchanged
pub fn changed_lines<'a>(before: &str, after: &'a str) -> Vec<&'a str> {
    assert_eq!(before.lines().count(), after.lines().count());
    before
        .lines()
        .zip(after.lines())
        .filter(|(old, new)| old != new)
        .map(|(_, new)| new)
        .collect()
}
