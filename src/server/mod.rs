//! Development server
//!
//! Serves the generated site and renders posts that were not pre-rendered
//! on first request (fallback mode). `/api/posts` returns the rendered
//! entries behind a cursor, handy for checking pagination by hand.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::PostsPagination;
use crate::generator::Generator;
use crate::pages::{home, post};
use crate::Blog;

/// Server state
struct ServerState {
    generator: Generator,
    /// Slugs with an on-demand render in progress
    rendering: Mutex<HashSet<String>>,
}

/// Removes a slug from the in-progress set when the render ends
struct RenderGuard<'a> {
    state: &'a ServerState,
    slug: String,
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut rendering) = self.state.rendering.lock() {
            rendering.remove(&self.slug);
        }
    }
}

impl ServerState {
    fn new(generator: Generator) -> Self {
        Self {
            generator,
            rendering: Mutex::new(HashSet::new()),
        }
    }

    /// Claim the render of `slug`; `None` if another request already has it
    fn claim(&self, slug: &str) -> Option<RenderGuard<'_>> {
        let mut rendering = self.rendering.lock().unwrap_or_else(|p| p.into_inner());
        rendering.insert(slug.to_string()).then(|| RenderGuard {
            state: self,
            slug: slug.to_string(),
        })
    }
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let generator = Generator::new(blog, blog.content_api()?)?;
    let app = router(generator);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes of the development server
pub fn router(generator: Generator) -> Router {
    routes(Arc::new(ServerState::new(generator)))
}

fn routes(state: Arc<ServerState>) -> Router {
    let public_dir = state.generator.public_dir().to_path_buf();

    Router::new()
        .route("/api/posts", get(load_more_handler))
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve a post page, rendering it on demand when it was not pre-rendered
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let generator = &state.generator;

    if let Some(path) = generator.post_output_path(&slug) {
        if let Ok(html) = tokio::fs::read_to_string(&path).await {
            return Html(html).into_response();
        }
    }

    let Some(_guard) = state.claim(&slug) else {
        return match post::render(generator.pages(), post::PostPage::Loading) {
            Ok(html) => Html(html).into_response(),
            Err(e) => internal_error(e),
        };
    };

    tracing::info!("Rendering {} on demand", slug);
    match generator.generate_post(&slug).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found(generator),
        Err(e) => internal_error(e),
    }
}

#[derive(Debug, Deserialize)]
struct LoadMoreQuery {
    next_page: String,
}

/// Response of the load-more endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadMoreResponse {
    /// Rendered entries to append to the listing
    pub html: String,
    pub next_page: Option<String>,
}

/// Fetch the page behind a cursor and render its entries
async fn load_more_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LoadMoreQuery>,
) -> Response {
    let generator = &state.generator;

    let response = match generator.api().fetch_page(&query.next_page).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Load more failed for {}: {}", query.next_page, e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    let page = match PostsPagination::from_response(response) {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Malformed page at {}: {}", query.next_page, e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    match home::render_entries(generator.pages(), &page.results) {
        Ok(html) => Json(LoadMoreResponse {
            html,
            next_page: page.next_page,
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

fn not_found(generator: &Generator) -> Response {
    match generator.pages().render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}
