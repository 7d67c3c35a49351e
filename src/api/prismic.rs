//! Prismic REST API v2 client

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{render_query, ApiError, ApiResponse, ContentApi, Document, Predicate, QueryOptions, Result};

/// Repository metadata returned by the API root
#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master: bool,
}

/// Client for a Prismic repository endpoint such as
/// `https://<repo>.cdn.prismic.io/api/v2`
pub struct PrismicClient {
    client: Client,
    endpoint: Url,
}

impl PrismicClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolve the current master ref
    ///
    /// The ref names a snapshot of the repository, so it is looked up again for
    /// every search to pick up newly published documents.
    async fn master_ref(&self) -> Result<String> {
        let root: ApiRoot = self.get_json(self.endpoint.clone()).await?;
        let master = root
            .refs
            .into_iter()
            .find(|r| r.is_master)
            .ok_or(ApiError::MissingRef)?;
        tracing::debug!("Resolved master ref {}", master.reference);
        Ok(master.reference)
    }

    fn search_url(&self) -> Result<Url> {
        let base = format!("{}/documents/search", self.endpoint.as_str().trim_end_matches('/'));
        Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))
    }

    async fn search(&self, predicates: &[Predicate], page_size: Option<usize>) -> Result<ApiResponse> {
        let reference = self.master_ref().await?;
        let mut url = self.search_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", &reference);
            pairs.append_pair("q", &render_query(predicates));
            if let Some(size) = page_size {
                pairs.append_pair("pageSize", &size.to_string());
            }
        }
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// A cursor is only followed when it points at the same origin as the endpoint
    fn check_cursor(&self, cursor: &str) -> Result<Url> {
        let url = Url::parse(cursor).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", cursor, e)))?;
        if url.origin() != self.endpoint.origin() {
            return Err(ApiError::ForeignCursor(cursor.to_string()));
        }
        Ok(url)
    }
}

#[async_trait]
impl ContentApi for PrismicClient {
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<ApiResponse> {
        self.search(predicates, options.page_size).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<Document>> {
        let predicates = [
            Predicate::document_type(doc_type),
            Predicate::at(format!("my.{}.uid", doc_type), uid),
        ];
        let response = self.search(&predicates, Some(1)).await?;
        Ok(response.results.into_iter().next())
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse> {
        let url = self.check_cursor(cursor)?;
        self.get_json(url).await
    }
}
