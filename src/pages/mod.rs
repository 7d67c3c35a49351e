//! Page controllers
//!
//! Each page has a build-time loader that reshapes content API documents
//! into a narrow view model, and a render function turning that model into
//! HTML.

pub mod home;
pub mod post;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::helpers::DateFormatter;
use crate::templates::TemplateRenderer;

/// Shared rendering state for every page
pub struct PageContext {
    pub renderer: TemplateRenderer,
    pub dates: DateFormatter,
    pub words_per_minute: usize,
}

impl PageContext {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            renderer: TemplateRenderer::new(config)?,
            dates: DateFormatter::from_config(config),
            words_per_minute: config.words_per_minute,
        })
    }

    /// The page shown for unknown slugs
    pub fn render_not_found(&self) -> Result<String> {
        self.renderer
            .render("404.html", &self.renderer.base_context())
    }
}
