//! Post page: a single post with its estimated reading time

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::PageContext;
use crate::api::{ContentApi, Predicate, QueryOptions};
use crate::config::SiteConfig;
use crate::content::richtext::is_safe_url;
use crate::content::PostDetail;
use crate::helpers::{date_xml, is_valid_slug};
use crate::templates::{PostView, SectionView};

/// Route parameters of one pre-rendered post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParams {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticPath {
    pub params: PathParams,
}

/// Posts to pre-render; others are rendered on first request when `fallback` is set
#[derive(Debug, Clone, Serialize)]
pub struct StaticPaths {
    pub paths: Vec<StaticPath>,
    pub fallback: bool,
}

/// Enumerate the slugs of all posts returned by the type query, in API order
pub async fn get_static_paths(api: &dyn ContentApi, config: &SiteConfig) -> Result<StaticPaths> {
    let response = api
        .query(
            &[Predicate::document_type(&config.document_type)],
            &QueryOptions::page_size(config.paths_page_size),
        )
        .await
        .context("Failed to query post paths")?;

    if response.next_page.is_some() {
        tracing::info!(
            "{} of {} posts pre-rendered, the rest render on demand",
            response.results.len(),
            response.total_results_size
        );
    }

    let paths = response
        .results
        .into_iter()
        .filter_map(|doc| match doc.uid {
            Some(uid) => Some(StaticPath {
                params: PathParams { slug: uid },
            }),
            None => {
                tracing::warn!("Skipping document {} without uid", doc.id);
                None
            }
        })
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: true,
    })
}

/// Load the post for `slug`; `None` when no post has that uid
pub async fn get_static_props(
    api: &dyn ContentApi,
    config: &SiteConfig,
    slug: &str,
) -> Result<Option<PostDetail>> {
    if !is_valid_slug(slug) {
        return Ok(None);
    }

    let Some(doc) = api
        .get_by_uid(&config.document_type, slug)
        .await
        .with_context(|| format!("Failed to fetch post {}", slug))?
    else {
        return Ok(None);
    };

    let post = PostDetail::from_document(doc).with_context(|| format!("Malformed post {}", slug))?;
    Ok(Some(post))
}

/// What the post page shows
#[derive(Debug, Clone, Copy)]
pub enum PostPage<'a> {
    /// The post is still being rendered on demand
    Loading,
    Ready(&'a PostDetail),
}

/// Shape a post for display; reading time is computed on every call
pub fn post_view(post: &PostDetail, ctx: &PageContext) -> PostView {
    PostView {
        title: post.data.title.clone(),
        banner: post
            .data
            .banner
            .url
            .clone()
            .filter(|u| is_safe_url(u, false)),
        date: ctx.dates.format(post.first_publication_date.as_ref()),
        datetime: date_xml(post.first_publication_date.as_ref()),
        author: post.data.author.clone(),
        reading_time: post.reading_time(ctx.words_per_minute),
        sections: post
            .data
            .content
            .iter()
            .map(|section| SectionView {
                heading: section.heading.clone().filter(|h| !h.is_empty()),
                body: section.body_html(),
            })
            .collect(),
    }
}

/// Render the post page
pub fn render(ctx: &PageContext, page: PostPage<'_>) -> Result<String> {
    let context = ctx.renderer.base_context();
    match page {
        PostPage::Loading => ctx.renderer.render("loading.html", &context),
        PostPage::Ready(post) => {
            let mut context = context;
            context.insert("post", &post_view(post, ctx));
            ctx.renderer.render("post.html", &context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{post, MemoryApi};
    use crate::api::Document;

    #[tokio::test]
    async fn test_static_paths_one_per_document_in_order() {
        let api = MemoryApi::with_posts(&["c", "a", "b"]);
        let paths = get_static_paths(&api, &SiteConfig::default()).await.unwrap();
        let slugs: Vec<_> = paths.paths.iter().map(|p| p.params.slug.as_str()).collect();
        assert_eq!(slugs, ["c", "a", "b"]);
        assert!(paths.fallback);
    }

    #[tokio::test]
    async fn test_static_paths_ignore_other_types() {
        let mut page: Document = post("about", "About");
        page.doc_type = "page".to_string();
        let api = MemoryApi::new(vec![post("a", "A"), page]);
        let paths = get_static_paths(&api, &SiteConfig::default()).await.unwrap();
        assert_eq!(paths.paths.len(), 1);
    }

    #[tokio::test]
    async fn test_static_paths_serialize() {
        let api = MemoryApi::with_posts(&["hello"]);
        let paths = get_static_paths(&api, &SiteConfig::default()).await.unwrap();
        assert_eq!(
            serde_json::to_value(&paths).unwrap(),
            serde_json::json!({"paths": [{"params": {"slug": "hello"}}], "fallback": true})
        );
    }

    #[tokio::test]
    async fn test_static_props() {
        let api = MemoryApi::with_posts(&["como-utilizar-hooks"]);
        let config = SiteConfig::default();

        let found = get_static_props(&api, &config, "como-utilizar-hooks")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.data.title, "COMO-UTILIZAR-HOOKS");
        assert_eq!(found.data.content.len(), 1);

        assert!(get_static_props(&api, &config, "missing").await.unwrap().is_none());
        assert!(get_static_props(&api, &config, "../etc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_render_post() {
        let api = MemoryApi::with_posts(&["hooks"]);
        let config = SiteConfig::default();
        let ctx = PageContext::new(&config).unwrap();
        let post = get_static_props(&api, &config, "hooks").await.unwrap().unwrap();

        let html = render(&ctx, PostPage::Ready(&post)).unwrap();
        assert!(html.contains("<h1>HOOKS</h1>"));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("Joseph Oliveira"));
        assert!(html.contains("1 min"));
        assert!(html.contains("<h2>Proin et varius</h2>"));
        assert!(html.contains("<p>Lorem ipsum dolor sit amet</p>"));
        assert!(html.contains("class=\"banner\""));
    }

    #[test]
    fn test_render_loading() {
        let ctx = PageContext::new(&SiteConfig::default()).unwrap();
        let html = render(&ctx, PostPage::Loading).unwrap();
        assert!(html.contains("Carregando..."));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_post_view_reading_time() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "id": "1",
            "uid": "short",
            "type": "posts",
            "first_publication_date": null,
            "data": {
                "title": "Short",
                "content": [
                    {"heading": "Intro", "body": [{"type": "paragraph", "text": "a b c"}]},
                    {"heading": "", "body": [{"type": "paragraph", "text": "d e"}]}
                ]
            }
        }))
        .unwrap();
        let post = PostDetail::from_document(doc).unwrap();
        let ctx = PageContext::new(&SiteConfig::default()).unwrap();

        let view = post_view(&post, &ctx);
        assert_eq!(view.reading_time, 1);
        assert_eq!(view.date, "-");
        assert_eq!(view.banner, None);
        assert_eq!(view.sections[1].heading, None);
    }

    #[test]
    fn test_banner_must_be_a_web_url() {
        let ctx = PageContext::new(&SiteConfig::default()).unwrap();
        let mut doc = post("hooks", "Hooks");
        doc.data["banner"]["url"] = serde_json::json!("javascript:alert(1)");
        let detail = PostDetail::from_document(doc).unwrap();

        assert_eq!(post_view(&detail, &ctx).banner, None);
        let html = render(&ctx, PostPage::Ready(&detail)).unwrap();
        assert!(!html.contains("class=\"banner\""));
        assert!(!html.contains("javascript:"));
    }
}
