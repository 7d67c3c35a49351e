//! Built-in theme templates using the Tera template engine
//!
//! Templates and static assets are embedded directly in the binary.
//! Autoescaping stays on: the only markup injected verbatim is rich text
//! rendered to [`SafeHtml`](crate::content::SafeHtml).

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::SafeHtml;
use crate::i18n::{I18n, Labels};

/// Static files copied to the public directory, as (path, contents)
pub const ASSETS: &[(&str, &str)] = &[
    ("css/style.css", include_str!("assets/style.css")),
    ("js/load-more.js", include_str!("assets/load-more.js")),
];

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
    labels: Labels,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("home.html", include_str!("theme/home.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("404.html", include_str!("theme/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_cards.html",
                include_str!("theme/partials/post_cards.html"),
            ),
        ])?;

        let labels = I18n::new(&config.language)?.labels();

        Ok(Self {
            tera,
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                language: config.language.clone(),
            },
            labels,
        })
    }

    /// Create a context with the variables every template sees
    pub fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("labels", &self.labels);
        context
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
}

/// A post entry on the listing page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub url: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub datetime: String,
    pub author: String,
}

/// Settings the load-more script needs to format fetched posts like
/// pre-rendered ones
#[derive(Debug, Clone, Serialize)]
pub struct ListingOptions {
    /// Abbreviated month names, comma separated
    pub months: String,
    pub timezone: String,
    pub placeholder: String,
}

/// A post detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub banner: Option<String>,
    pub date: String,
    pub datetime: String,
    pub author: String,
    pub reading_time: usize,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: Option<String>,
    pub body: SafeHtml,
}
