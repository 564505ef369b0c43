//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub posts_dir: String,
    pub projects_dir: String,
    pub post_index: String,
    pub project_index: String,

    // Writing
    /// chrono format used for the default post date
    pub date_format: String,
    /// Drop the leading `# Title` line when building post pages
    pub strip_heading: bool,

    // Preview server
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            projects_dir: "projects".to_string(),
            post_index: "posts.json".to_string(),
            project_index: "projects.json".to_string(),

            date_format: "%B %d, %Y".to_string(),
            strip_heading: true,

            server: ServerConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Preview server defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub ip: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            ip: "localhost".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.post_index, "posts.json");
        assert_eq!(config.date_format, "%B %d, %Y");
        assert!(config.strip_heading);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
title: Miles
posts_dir: blog
strip_heading: false
server:
  port: 8080
analytics: abc123
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.posts_dir, "blog");
        assert_eq!(config.projects_dir, "projects");
        assert!(!config.strip_heading);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert!(config.extra.contains_key("analytics"));
        assert!(config.extra.contains_key("title"));
    }
}
