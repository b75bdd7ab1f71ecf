//! Where guide files come from
//!
//! All reads of guide content go through [`ContentSource`], so listing and
//! rendering work the same against a directory on disk or an in-memory map.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A flat collection of named text files
pub trait ContentSource {
    /// Human-readable location, used in logs and errors
    fn location(&self) -> PathBuf;

    /// File names of the direct entries, in enumeration order
    fn entries(&self) -> Result<Vec<String>>;

    /// Full text of one entry
    fn read(&self, name: &str) -> Result<String>;
}

/// Guide files in a directory on disk (no recursion)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ContentSource for DirectorySource {
    fn location(&self) -> PathBuf {
        self.dir.clone()
    }

    fn entries(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(Error::NotFound {
                path: self.dir.clone(),
            });
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                match e.into_io_error() {
                    Some(io) => Error::io(path, io),
                    None => Error::Io {
                        path,
                        source: std::io::Error::new(
                            std::io::ErrorKind::Other,
                            "filesystem loop detected",
                        ),
                    },
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path()),
            }
        }

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| Error::io(path, e))
    }
}

/// Guide files held in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: IndexMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
        }
    }
}

impl ContentSource for MemorySource {
    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn entries(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                path: self.location().join(name),
            })
    }
}
