//! Content module - view models reshaped from content API documents

mod post;
pub mod reading_time;
pub mod richtext;

pub use post::{
    Banner, DetailData, PostDetail, PostSummary, PostsPagination, Section, SummaryData,
};
pub use richtext::{RichTextBlock, SafeHtml};
