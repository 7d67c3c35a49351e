//! Generator module - writes the static site to the public directory

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::api::ContentApi;
use crate::config::SiteConfig;
use crate::helpers::is_valid_slug;
use crate::pages::{home, post, PageContext};
use crate::templates::ASSETS;
use crate::Blog;

/// What a generation run produced
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Posts on the first listing page
    pub listed: usize,
    /// Post pages written
    pub posts: usize,
    /// Enumerated slugs whose post could not be loaded
    pub missing: Vec<String>,
}

/// Static site generator
pub struct Generator {
    public_dir: PathBuf,
    config: SiteConfig,
    api: Arc<dyn ContentApi>,
    pages: PageContext,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog, api: Arc<dyn ContentApi>) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            config: blog.config.clone(),
            api,
            pages: PageContext::new(&blog.config)?,
        })
    }

    pub fn pages(&self) -> &PageContext {
        &self.pages
    }

    pub fn api(&self) -> &Arc<dyn ContentApi> {
        &self.api
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateReport> {
        fs::create_dir_all(&self.public_dir)
            .await
            .with_context(|| format!("Failed to create {:?}", self.public_dir))?;

        self.copy_assets().await?;

        let mut report = GenerateReport {
            listed: self.generate_home().await?,
            ..GenerateReport::default()
        };

        let not_found = self.pages.render_not_found()?;
        write_page(&self.public_dir.join("404.html"), &not_found).await?;

        let paths = post::get_static_paths(self.api.as_ref(), &self.config).await?;
        for path in &paths.paths {
            let slug = &path.params.slug;
            match self.generate_post(slug).await? {
                Some(_) => report.posts += 1,
                None => {
                    tracing::warn!("Post {} listed but not found", slug);
                    report.missing.push(slug.clone());
                }
            }
        }

        tracing::info!(
            "Generated home page ({} posts) and {} post pages",
            report.listed,
            report.posts
        );
        Ok(report)
    }

    /// Generate index.html from the first page of posts
    async fn generate_home(&self) -> Result<usize> {
        let props = home::get_static_props(self.api.as_ref(), &self.config).await?;
        let state = home::ListingState::new(props.posts_pagination);
        let html = home::render(&self.pages, &state)?;
        write_page(&self.public_dir.join("index.html"), &html).await?;
        tracing::debug!("Generated home page, more pages: {}", state.has_more());
        Ok(state.posts().len())
    }

    /// Render the page of one post and write it; `None` when the post does not exist
    pub async fn generate_post(&self, slug: &str) -> Result<Option<String>> {
        let Some(detail) = post::get_static_props(self.api.as_ref(), &self.config, slug).await?
        else {
            return Ok(None);
        };

        let html = post::render(&self.pages, post::PostPage::Ready(&detail))?;
        if let Some(output_path) = self.post_output_path(slug) {
            write_page(&output_path, &html).await?;
            tracing::debug!("Generated post: {:?}", output_path);
        }
        Ok(Some(html))
    }

    /// Output file of a post page, `None` for slugs unusable as a directory name
    pub fn post_output_path(&self, slug: &str) -> Option<PathBuf> {
        is_valid_slug(slug).then(|| self.public_dir.join("post").join(slug).join("index.html"))
    }

    /// Copy embedded theme assets
    async fn copy_assets(&self) -> Result<()> {
        for (path, contents) in ASSETS {
            write_page(&self.public_dir.join(path), contents).await?;
        }
        Ok(())
    }
}

/// Write a file, creating its parent directories
async fn write_page(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {:?}", path))
}
