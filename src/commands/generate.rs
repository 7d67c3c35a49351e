//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Fetch every post and write the static site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog, blog.content_api()?)?;
    let report = generator.generate().await?;

    if !report.missing.is_empty() {
        tracing::warn!(
            "{} listed posts could not be loaded: {}",
            report.missing.len(),
            report.missing.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
