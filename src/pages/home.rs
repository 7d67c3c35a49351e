//! Home page: post listing with "load more" pagination
//!
//! The listing starts from the first page of a type query and grows by
//! following the `next_page` cursor. All growth goes through
//! [`ListingState::append_page`]; loads are tagged with a [`LoadTicket`] so a
//! second load while one is pending is coalesced and a response that no
//! longer matches the pending ticket is dropped.

use anyhow::{Context as _, Result};
use std::sync::{Arc, Mutex};

use super::PageContext;
use crate::api::{ContentApi, Predicate, QueryOptions};
use crate::config::SiteConfig;
use crate::content::{PostSummary, PostsPagination};
use crate::helpers::{date_xml, post_url, DateFormatter};
use crate::templates::{ListingOptions, PostCard};

/// Build-time props of the home page
#[derive(Debug, Clone)]
pub struct HomeProps {
    pub posts_pagination: PostsPagination,
}

/// Query the first page of posts
pub async fn get_static_props(api: &dyn ContentApi, config: &SiteConfig) -> Result<HomeProps> {
    let response = api
        .query(
            &[Predicate::document_type(&config.document_type)],
            &QueryOptions::page_size(config.page_size),
        )
        .await
        .context("Failed to query posts for the home page")?;

    let posts_pagination =
        PostsPagination::from_response(response).context("Malformed post in listing")?;
    tracing::debug!(
        "Home page: {} posts, more: {}",
        posts_pagination.results.len(),
        posts_pagination.next_page.is_some()
    );

    Ok(HomeProps { posts_pagination })
}

/// Identifies one load-more request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    id: u64,
    cursor: String,
}

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }
}

/// Result of asking the state to start a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginLoad {
    /// No cursor left
    Exhausted,
    /// Another load is pending
    AlreadyLoading,
    Started(LoadTicket),
}

/// Posts accumulated so far and the cursor to continue from
#[derive(Debug, Clone, Default)]
pub struct ListingState {
    posts: Vec<PostSummary>,
    next_page: Option<String>,
    pending: Option<LoadTicket>,
    last_ticket: u64,
}

impl ListingState {
    pub fn new(pagination: PostsPagination) -> Self {
        Self::default().append_page(pagination.results, pagination.next_page)
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether the "load more" control is shown
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a fetched page and move the cursor to its `next_page`
    pub fn append_page(mut self, results: Vec<PostSummary>, next_page: Option<String>) -> Self {
        self.posts.extend(results);
        self.next_page = next_page;
        self
    }

    /// Reserve the current cursor for a new load
    pub fn begin_load(&mut self) -> BeginLoad {
        if self.pending.is_some() {
            return BeginLoad::AlreadyLoading;
        }
        let Some(cursor) = self.next_page.clone() else {
            return BeginLoad::Exhausted;
        };
        self.last_ticket += 1;
        let ticket = LoadTicket {
            id: self.last_ticket,
            cursor,
        };
        self.pending = Some(ticket.clone());
        BeginLoad::Started(ticket)
    }

    /// Apply the page fetched for `ticket`; returns false if the ticket is stale
    pub fn complete_load(&mut self, ticket: &LoadTicket, page: PostsPagination) -> bool {
        if self.pending.as_ref() != Some(ticket) {
            return false;
        }
        self.pending = None;
        *self = std::mem::take(self).append_page(page.results, page.next_page);
        true
    }

    /// Release `ticket` after a failed fetch, leaving the cursor in place
    pub fn abort_load(&mut self, ticket: &LoadTicket) {
        if self.pending.as_ref() == Some(ticket) {
            self.pending = None;
        }
    }
}

/// What a call to [`ListingController::load_more`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many posts were appended
    Appended(usize),
    /// Nothing left to load
    Exhausted,
    /// Coalesced into a load already pending
    AlreadyLoading,
    /// The response arrived after the listing moved on and was dropped
    Stale,
}

/// Owns the listing state of one reader and loads more posts into it
pub struct ListingController {
    api: Arc<dyn ContentApi>,
    state: Mutex<ListingState>,
}

impl ListingController {
    pub fn new(api: Arc<dyn ContentApi>, props: HomeProps) -> Self {
        Self {
            api,
            state: Mutex::new(ListingState::new(props.posts_pagination)),
        }
    }

    /// A copy of the current state
    pub fn state(&self) -> ListingState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch the page behind the current cursor and append it
    ///
    /// On failure the state is left as it was, so calling again retries the
    /// same cursor.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let ticket = match self.lock().begin_load() {
            BeginLoad::Started(ticket) => ticket,
            BeginLoad::Exhausted => return Ok(LoadOutcome::Exhausted),
            BeginLoad::AlreadyLoading => {
                tracing::debug!("Load more already pending");
                return Ok(LoadOutcome::AlreadyLoading);
            }
        };

        let page = match self.fetch(ticket.cursor()).await {
            Ok(page) => page,
            Err(e) => {
                self.lock().abort_load(&ticket);
                tracing::warn!("Failed to load more posts: {:#}", e);
                return Err(e);
            }
        };

        let count = page.results.len();
        if self.lock().complete_load(&ticket, page) {
            Ok(LoadOutcome::Appended(count))
        } else {
            tracing::debug!("Dropping stale page for {}", ticket.cursor());
            Ok(LoadOutcome::Stale)
        }
    }

    async fn fetch(&self, cursor: &str) -> Result<PostsPagination> {
        let response = self
            .api
            .fetch_page(cursor)
            .await
            .with_context(|| format!("Failed to fetch {}", cursor))?;
        PostsPagination::from_response(response).context("Malformed post in listing")
    }
}

/// Shape a summary for display
pub fn post_card(post: &PostSummary, dates: &DateFormatter) -> PostCard {
    PostCard {
        url: post.uid.as_deref().map(post_url),
        title: post.data.title.clone(),
        subtitle: post.data.subtitle.clone(),
        date: dates.format(post.first_publication_date.as_ref()),
        datetime: date_xml(post.first_publication_date.as_ref()),
        author: post.data.author.clone(),
    }
}

fn listing_options(dates: &DateFormatter) -> ListingOptions {
    ListingOptions {
        months: dates.month_abbreviations().join(","),
        timezone: dates.timezone().name().to_string(),
        placeholder: dates.placeholder().to_string(),
    }
}

fn post_cards(posts: &[PostSummary], dates: &DateFormatter) -> Vec<PostCard> {
    posts.iter().map(|p| post_card(p, dates)).collect()
}

/// Render the home page for the current listing state
pub fn render(ctx: &PageContext, state: &ListingState) -> Result<String> {
    let mut context = ctx.renderer.base_context();
    context.insert("posts", &post_cards(state.posts(), &ctx.dates));
    context.insert("next_page", &state.next_page());
    context.insert("listing", &listing_options(&ctx.dates));
    ctx.renderer.render("home.html", &context)
}

/// Render only the entries of `posts`, for appending to a rendered listing
pub fn render_entries(ctx: &PageContext, posts: &[PostSummary]) -> Result<String> {
    let mut context = ctx.renderer.base_context();
    context.insert("posts", &post_cards(posts, &ctx.dates));
    ctx.renderer.render("partials/post_cards.html", &context)
}
