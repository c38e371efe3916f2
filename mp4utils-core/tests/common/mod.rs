// mp4utils-core/tests/common/mod.rs
//
// Shared fixtures: a temporary source/destination/join layout and a config
// pointing at it.

#![allow(dead_code)]

use mp4utils_core::config::CoreConfig;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

pub struct Workspace {
    pub root: TempDir,
    pub config: CoreConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempdir().expect("Failed to create temp dir");
        let base = root.path();
        for dir in ["src", "dst", "join"] {
            std::fs::create_dir(base.join(dir)).expect("Failed to create subdir");
        }
        let config = CoreConfig::new(
            base.join("script.txt"),
            base.join("src"),
            base.join("dst"),
            base.join("join"),
        );
        Self { root, config }
    }

    pub fn write_script(&self, content: &str) {
        std::fs::write(&self.config.script_file, content).expect("Failed to write script");
    }

    /// Creates source files with dummy content.
    pub fn add_sources(&self, names: &[&str]) {
        for name in names {
            create_dummy_file(&self.config.source_dir, name);
        }
    }

    pub fn source(&self, name: &str) -> PathBuf {
        self.config.source_dir.join(name)
    }

    pub fn dest(&self, name: &str) -> PathBuf {
        self.config.dest_dir.join(name)
    }

    pub fn joined(&self, name: &str) -> PathBuf {
        self.config.join_dir.join(name)
    }

    /// Sorted names of the files in `dir`.
    pub fn list(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read dir")
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }
}

pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(b"dummy content").expect("Failed to write dummy content");
    file_path
}
