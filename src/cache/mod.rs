//! Build cache
//!
//! Remembers a hash of each post's markdown and of the render settings so
//! `build` can skip posts whose fragment is already up to date.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache directory, relative to the site root
pub const CACHE_DIR: &str = ".mdsite-cache";

/// Cache file name inside [`CACHE_DIR`]
const CACHE_FILE: &str = "db.json";

/// Hashes from the last successful build
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the settings that change rendered output
    pub settings_hash: u64,
    /// Content hash of each post, keyed by slug
    pub posts: HashMap<String, u64>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Create a new empty cache for the given render settings
    pub fn new(settings_hash: u64) -> Self {
        Self {
            version: Self::VERSION,
            settings_hash,
            posts: HashMap::new(),
        }
    }

    /// Load cache from disk; anything unreadable or from another format
    /// version gives an empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = cache_path(base_dir);
        let Ok(content) = fs::read_to_string(&cache_path) else {
            return Self::default();
        };

        match serde_json::from_str::<CacheDb>(&content) {
            Ok(db) if db.version == Self::VERSION => db,
            Ok(_) => {
                tracing::info!("Cache version mismatch, rebuilding everything");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache {:?}: {}", cache_path, e);
                Self::default()
            }
        }
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = cache_path(base_dir);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&cache_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// True when `slug` was built from identical markdown with identical settings
    pub fn is_fresh(&self, settings_hash: u64, slug: &str, content_hash: u64) -> bool {
        self.settings_hash == settings_hash && self.posts.get(slug) == Some(&content_hash)
    }

    pub fn record(&mut self, slug: &str, content_hash: u64) {
        self.posts.insert(slug.to_string(), content_hash);
    }
}

fn cache_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CACHE_DIR).join(CACHE_FILE)
}

/// Calculate a hash for content
pub fn hash_content(content: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
