//! Post view models
//!
//! Documents from the content API carry every field of the custom type;
//! the listing and detail pages each keep only what they render.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use super::reading_time;
use super::richtext::{self, RichTextBlock, SafeHtml};
use crate::api::{ApiResponse, Document};

/// Treat `null` text fields like empty ones
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A document without data reshapes like one with an empty data block
fn data_fields<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> serde_json::Result<T> {
    if data.is_null() {
        serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_value(data)
    }
}

/// Fields of a post shown on the listing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
}

/// A post as listed on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: Option<String>,
    #[serde(default, with = "crate::helpers::timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub data: SummaryData,
}

impl PostSummary {
    /// Keep only the listing fields of a document
    pub fn from_document(doc: Document) -> serde_json::Result<Self> {
        Ok(Self {
            uid: doc.uid,
            first_publication_date: doc.first_publication_date,
            data: data_fields(doc.data)?,
        })
    }
}

/// One page of the listing: its posts and the cursor to the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostsPagination {
    pub results: Vec<PostSummary>,
    pub next_page: Option<String>,
}

impl PostsPagination {
    /// Reshape a page of API results, preserving their order
    pub fn from_response(response: ApiResponse) -> serde_json::Result<Self> {
        let results = response
            .results
            .into_iter()
            .map(PostSummary::from_document)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            results,
            next_page: response.next_page,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,
}

/// A titled section of a post body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

impl Section {
    /// The body rendered to sanitized markup
    pub fn body_html(&self) -> SafeHtml {
        richtext::as_html(&self.body)
    }
}

/// Fields of a post shown on its own page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailData {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub subtitle: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
    #[serde(default)]
    pub content: Vec<Section>,
}

/// A post as shown on its detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: Option<String>,
    #[serde(default, with = "crate::helpers::timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub data: DetailData,
}

impl PostDetail {
    /// Keep only the detail fields of a document; sections are copied as-is
    pub fn from_document(doc: Document) -> serde_json::Result<Self> {
        Ok(Self {
            uid: doc.uid,
            first_publication_date: doc.first_publication_date,
            data: data_fields(doc.data)?,
        })
    }

    /// Estimated minutes to read the post
    pub fn reading_time(&self, words_per_minute: usize) -> usize {
        reading_time::reading_time(&self.data.content, words_per_minute)
    }
}
