//! Helper functions shared by the page controllers and templates

mod date;
pub mod timestamp;
mod url;

pub use date::*;
pub use url::*;
