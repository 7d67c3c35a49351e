//! In-memory content repository for tests

use async_trait::async_trait;
use reqwest::Url;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::{ApiError, ApiResponse, ContentApi, Document, Predicate, QueryOptions, Result};

const CURSOR_BASE: &str = "http://memory.test/documents/search";
const DEFAULT_PAGE_SIZE: usize = 20;

/// Serves a fixed list of documents, paginated like the real API
pub struct MemoryApi {
    documents: Vec<Document>,
    fetches: AtomicUsize,
    fail_fetches: AtomicBool,
    gate: Option<Arc<Notify>>,
}

/// A `posts` document with a title, author and one section
pub fn post(uid: &str, title: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": format!("About {}", title),
            "author": "Joseph Oliveira",
            "banner": {"url": format!("https://images.prismic.io/{}.png", uid)},
            "content": [{
                "heading": "Proin et varius",
                "body": [{"type": "paragraph", "text": "Lorem ipsum dolor sit amet", "spans": []}]
            }]
        }
    }))
    .expect("valid post fixture")
}

impl MemoryApi {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            fetches: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Posts titled after their uids
    pub fn with_posts(uids: &[&str]) -> Self {
        Self::new(uids.iter().map(|uid| post(uid, &uid.to_uppercase())).collect())
    }

    /// Hold every cursor fetch until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Number of cursor fetches started so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn page(&self, doc_type: Option<&str>, page: usize, size: usize) -> ApiResponse {
        let matching: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| doc_type.map_or(true, |t| d.doc_type == t))
            .collect();
        let start = (page.max(1) - 1) * size;
        let results = matching.iter().skip(start).take(size).map(|d| (*d).clone()).collect();
        let next_page = (start + size < matching.len()).then(|| {
            format!(
                "{}?type={}&page={}&pageSize={}",
                CURSOR_BASE,
                doc_type.unwrap_or(""),
                page + 1,
                size
            )
        });
        ApiResponse {
            page: page as u32,
            total_results_size: matching.len(),
            results,
            next_page,
        }
    }
}

#[async_trait]
impl ContentApi for MemoryApi {
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<ApiResponse> {
        let doc_type = predicates.iter().find_map(|p| match p {
            Predicate::At { path, value } if path == "document.type" => Some(value.as_str()),
            _ => None,
        });
        Ok(self.page(doc_type, 1, options.page_size.unwrap_or(DEFAULT_PAGE_SIZE)))
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<Document>> {
        Ok(self
            .documents
            .iter()
            .find(|d| d.doc_type == doc_type && d.uid.as_deref() == Some(uid))
            .cloned())
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                url: cursor.to_string(),
            });
        }

        let url = Url::parse(cursor).map_err(|_| ApiError::InvalidUrl(cursor.to_string()))?;
        if !cursor.starts_with(CURSOR_BASE) {
            return Err(ApiError::ForeignCursor(cursor.to_string()));
        }
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };
        let doc_type = param("type").filter(|t| !t.is_empty());
        let page = param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let size = param("pageSize")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(self.page(doc_type.as_deref(), page, size))
    }
}
