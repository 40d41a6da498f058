//! Shared fixtures: temporary content trees.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary content root
pub struct ContentTree {
    pub dir: TempDir,
}

impl ContentTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a document at `<root>/<rel>`, creating parents
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// A document with a metadata block
pub fn doc(fields: &[(&str, &str)], body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    out.push_str("---\n");
    out.push_str(body);
    out
}
