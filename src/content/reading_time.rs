//! Reading time estimate

use super::Section;

/// Count the words of a text split on single spaces
///
/// Consecutive spaces yield empty tokens which still count, so
/// `"a  b"` is three words. An empty string has none.
pub fn count_words(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split(' ').count()
    }
}

/// Words in a section: its heading plus the text of every body block
pub fn section_words(section: &Section) -> usize {
    let heading = section.heading.as_deref().map(count_words).unwrap_or(0);
    let body: usize = section.body.iter().map(|block| count_words(&block.text)).sum();
    heading + body
}

/// Total words across all sections
pub fn total_words(sections: &[Section]) -> usize {
    sections.iter().map(section_words).sum()
}

/// Minutes needed to read the sections, rounded up
pub fn reading_time(sections: &[Section], words_per_minute: usize) -> usize {
    total_words(sections).div_ceil(words_per_minute.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RichTextBlock;

    fn section(heading: Option<&str>, texts: &[&str]) -> Section {
        Section {
            heading: heading.map(str::to_string),
            body: texts.iter().map(|t| RichTextBlock::paragraph(t)).collect(),
        }
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("a b c"), 3);
        assert_eq!(count_words("Intro"), 1);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("a  b"), 3);
        // Only the space character separates words
        assert_eq!(count_words("a\tb\nc"), 1);
    }

    #[test]
    fn test_short_post_takes_one_minute() {
        let sections = vec![
            section(Some("Intro"), &["a b c"]),
            section(Some(""), &["d e"]),
        ];
        assert_eq!(total_words(&sections), 6);
        assert_eq!(reading_time(&sections, 200), 1);
    }

    #[test]
    fn test_missing_heading_counts_zero() {
        let s = section(None, &["one two", "three"]);
        assert_eq!(section_words(&s), 3);
    }

    #[test]
    fn test_rounds_up() {
        let text = vec!["word"; 201].join(" ");
        let sections = vec![section(None, &[text.as_str()])];
        assert_eq!(reading_time(&sections, 200), 2);

        let text = vec!["word"; 200].join(" ");
        let sections = vec![section(None, &[text.as_str()])];
        assert_eq!(reading_time(&sections, 200), 1);
    }

    #[test]
    fn test_empty_post() {
        assert_eq!(reading_time(&[], 200), 0);
    }
}
