//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL of a post detail page
///
/// # Examples
/// ```ignore
/// post_url("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_url(slug: &str) -> String {
    format!("/post/{}", utf8_percent_encode(slug, SEGMENT))
}

/// A slug can be used as a single output directory name
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
