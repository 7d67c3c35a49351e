//! Content API access
//!
//! The page controllers only see the [`ContentApi`] trait: a query by
//! predicate, a lookup by uid, and a plain fetch of the opaque `next_page`
//! cursor handed back with every page of results.

mod error;
#[cfg(test)]
pub mod memory;
mod prismic;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{ApiError, Result};
pub use prismic::PrismicClient;

/// A raw document as returned by the content API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, with = "crate::helpers::timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One page of query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_results_size: usize,
    pub results: Vec<Document>,
    /// Opaque cursor for the next page, `None` on the last page
    #[serde(default)]
    pub next_page: Option<String>,
}

/// A query predicate, rendered in the API's predicate language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    At { path: String, value: String },
}

impl Predicate {
    /// `at(path, "value")`: exact match on a document field
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Match documents of a custom type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                let value = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "[at({}, \"{}\")]", path, value)
            }
        }
    }
}

/// Render a list of predicates as the `q` query parameter
pub fn render_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}

/// Options accepted by [`ContentApi::query`]
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Results per page; `None` lets the API pick its default
    pub page_size: Option<usize>,
}

impl QueryOptions {
    pub fn page_size(size: usize) -> Self {
        Self {
            page_size: Some(size),
        }
    }
}

/// Read-only access to the headless content repository
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Query documents matching all predicates, first page only
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<ApiResponse>;

    /// Fetch the document of `doc_type` whose uid is `uid`
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<Document>>;

    /// Follow a `next_page` cursor returned by a previous query
    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_query() {
        let q = render_query(&[Predicate::document_type("posts")]);
        assert_eq!(q, r#"[[at(document.type, "posts")]]"#);

        let q = render_query(&[
            Predicate::document_type("posts"),
            Predicate::at("my.posts.uid", "hello"),
        ]);
        assert_eq!(
            q,
            r#"[[at(document.type, "posts")][at(my.posts.uid, "hello")]]"#
        );
    }

    #[test]
    fn test_predicate_escapes_quotes() {
        let p = Predicate::at("my.posts.uid", r#"a"b"#);
        assert_eq!(p.to_string(), r#"[at(my.posts.uid, "a\"b")]"#);
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "next_page": "https://repo.cdn.prismic.io/api/v2/documents/search?page=2&pageSize=1",
            "results": [{
                "id": "YEz1",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": "2021-03-15T19:25:28+0000",
                "data": {"title": "Como utilizar Hooks"}
            }]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert!(response.next_page.is_some());
        let doc = &response.results[0];
        assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(doc.doc_type, "posts");
        assert!(doc.first_publication_date.is_some());
    }

    #[test]
    fn test_parse_response_last_page() {
        let json = r#"{"results": [{"id": "x", "type": "posts", "first_publication_date": null, "data": {}}], "next_page": null}"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.next_page.is_none());
        assert!(response.results[0].first_publication_date.is_none());
        assert!(response.results[0].uid.is_none());
    }
}
