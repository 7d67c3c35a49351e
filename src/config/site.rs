//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // Content API
    pub api_endpoint: String,
    pub document_type: String,
    /// Page size of the listing query; each "load more" fetches one more page
    pub page_size: usize,
    /// Page size of the query used to enumerate pre-rendered post paths
    pub paths_page_size: usize,

    // Rendering
    pub words_per_minute: usize,
    /// Shown instead of a date for documents that were never published
    pub date_placeholder: String,

    // Directory
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),
            timezone: "UTC".to_string(),

            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            document_type: "posts".to_string(),
            page_size: 1,
            paths_page_size: 100,

            words_per_minute: 200,
            date_placeholder: "-".to_string(),

            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controllers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.paths_page_size == 0 {
            anyhow::bail!("page_size and paths_page_size must be at least 1");
        }
        if self.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be at least 1");
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            anyhow::bail!("Unknown timezone: {}", self.timezone);
        }
        Ok(())
    }

    /// Timezone publication dates are displayed in
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
