//! List site content

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

use crate::api::ContentApi;
use crate::helpers::DateFormatter;
use crate::pages::home::{self, ListingController, LoadOutcome};
use crate::pages::post;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str, all: bool) -> Result<()> {
    let api = blog.content_api()?;
    let mut out = std::io::stdout().lock();
    match content_type {
        "post" | "posts" => list_posts(blog, api, all, &mut out).await,
        "path" | "paths" => list_paths(blog, api.as_ref(), &mut out).await,
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, paths",
                content_type
            );
        }
    }
}

/// Print the listing, following the cursor to the end when `all` is set
pub async fn list_posts<W: Write>(
    blog: &Blog,
    api: Arc<dyn ContentApi>,
    all: bool,
    out: &mut W,
) -> Result<()> {
    let props = home::get_static_props(api.as_ref(), &blog.config).await?;
    let controller = ListingController::new(api, props);

    if all {
        while let LoadOutcome::Appended(count) = controller.load_more().await? {
            tracing::debug!("Loaded {} more posts", count);
        }
    }

    let state = controller.state();
    let dates = DateFormatter::from_config(&blog.config);
    writeln!(out, "Posts ({}):", state.posts().len())?;
    for post in state.posts() {
        writeln!(
            out,
            "  {} - {} [{}] by {}",
            dates.format(post.first_publication_date.as_ref()),
            post.data.title,
            post.uid.as_deref().unwrap_or("-"),
            post.data.author
        )?;
    }
    if let Some(next) = state.next_page() {
        writeln!(out, "More posts at {}", next)?;
    }

    Ok(())
}

/// Print the slugs that `generate` pre-renders
pub async fn list_paths<W: Write>(blog: &Blog, api: &dyn ContentApi, out: &mut W) -> Result<()> {
    let paths = post::get_static_paths(api, &blog.config).await?;
    writeln!(out, "Paths ({}):", paths.paths.len())?;
    for path in &paths.paths {
        writeln!(out, "  /post/{}", path.params.slug)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;
    use crate::config::SiteConfig;

    fn blog() -> Blog {
        Blog::with_config("/tmp/unused", SiteConfig::default())
    }

    #[tokio::test]
    async fn test_list_first_page() {
        let api = Arc::new(MemoryApi::with_posts(&["a", "b"]));
        let mut out = Vec::new();
        list_posts(&blog(), api, false, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Posts (1):"));
        assert!(out.contains("15 mar 2021 - A [a] by Joseph Oliveira"));
        assert!(out.contains("More posts at http://memory.test/"));
    }

    #[tokio::test]
    async fn test_list_all_follows_cursor() {
        let api = Arc::new(MemoryApi::with_posts(&["a", "b", "c"]));
        let mut out = Vec::new();
        list_posts(&blog(), api, true, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Posts (3):"));
        assert!(!out.contains("More posts"));
    }

    #[tokio::test]
    async fn test_list_paths() {
        let api = MemoryApi::with_posts(&["a", "b"]);
        let mut out = Vec::new();
        list_paths(&blog(), &api, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "Paths (2):\n  /post/a\n  /post/b\n");
    }
}
