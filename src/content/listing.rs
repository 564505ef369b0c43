//! Post and project listings (`posts.json`, `projects.json`)
//!
//! The browser side reads these files to build the blog and project lists,
//! so the on-disk shape is a plain JSON array ordered newest first.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing a listing file
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// A blog post record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl PostEntry {
    pub fn new(title: &str, slug: &str, date: &str, description: &str) -> Self {
        let description = if description.trim().is_empty() {
            format!("Blog post: {}", title)
        } else {
            description.to_string()
        };
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            date: date.to_string(),
            description,
        }
    }
}

/// A project record; links straight to an external URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectEntry {
    pub fn new(title: &str, url: &str, description: &str) -> Self {
        let description = if description.trim().is_empty() {
            format!("Project: {}", title)
        } else {
            description.to_string()
        };
        Self {
            title: title.to_string(),
            url: url.to_string(),
            description,
        }
    }
}

/// Identity used to replace an existing record on upsert
pub trait ListingKey {
    fn same_entry(&self, other: &Self) -> bool;
}

impl ListingKey for PostEntry {
    fn same_entry(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl ListingKey for ProjectEntry {
    fn same_entry(&self, other: &Self) -> bool {
        self.title.to_lowercase() == other.title.to_lowercase()
    }
}

/// An ordered listing, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing<T> {
    entries: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Listing<T>
where
    T: Serialize + DeserializeOwned + ListingKey,
{
    /// Load a listing; a missing file is an empty listing
    pub fn load(path: &Path) -> Result<Self, ListingError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No listing at {:?}, starting empty", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ListingError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ListingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the listing as 2-space indented JSON
    pub fn save(&self, path: &Path) -> Result<(), ListingError> {
        let write_err = |source| ListingError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ListingError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)
    }

    /// Drop any record with the same identity and put `entry` at the front
    pub fn upsert(&mut self, entry: T) {
        self.entries.retain(|e| !e.same_entry(&entry));
        self.entries.insert(0, entry);
    }

    /// Add `entry` at the back unless a record with the same identity exists
    pub fn append_missing(&mut self, entry: T) -> bool {
        if self.entries.iter().any(|e| e.same_entry(&entry)) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [T] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Listing<PostEntry> {
    pub fn find(&self, slug: &str) -> Option<&PostEntry> {
        self.entries.iter().find(|p| p.slug == slug)
    }
}

/// Reject titles and URLs that are blank after trimming
pub fn require(field: &'static str, value: &str) -> Result<(), ListingError> {
    if value.trim().is_empty() {
        Err(ListingError::EmptyField(field))
    } else {
        Ok(())
    }
}
