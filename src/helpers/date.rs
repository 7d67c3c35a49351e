//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

use crate::config::SiteConfig;

/// Display format of publication dates, "15 mar 2021"
const DISPLAY_FORMAT: &str = "%d %b %Y";

/// chrono locale for a site language, English when unknown
pub fn locale(language: &str) -> Locale {
    match language.to_ascii_lowercase().as_str() {
        "pt-br" | "pt_br" | "pt" => Locale::pt_BR,
        _ => Locale::en_US,
    }
}

/// Format a date as "dd MMM yyyy" with localized month names
///
/// # Examples
/// ```ignore
/// format_date(&date, "pt-BR") // -> "15 mar 2021"
/// ```
pub fn format_date<Tz2: TimeZone>(date: &DateTime<Tz2>, language: &str) -> String
where
    Tz2::Offset: fmt::Display,
{
    date.format_localized(DISPLAY_FORMAT, locale(language))
        .to_string()
}

/// Formats publication dates for display
#[derive(Debug, Clone)]
pub struct DateFormatter {
    language: String,
    timezone: Tz,
    placeholder: String,
}

impl DateFormatter {
    pub fn new(language: &str, timezone: Tz, placeholder: &str) -> Self {
        Self {
            language: language.to_string(),
            timezone,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.language, config.tz(), &config.date_placeholder)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Abbreviated month names, January first
    pub fn month_abbreviations(&self) -> Vec<String> {
        let locale = locale(&self.language);
        (1..=12)
            .filter_map(|month| Utc.with_ymd_and_hms(2021, month, 1, 0, 0, 0).single())
            .map(|date| date.format_localized("%b", locale).to_string())
            .collect()
    }

    /// Format a nullable publication date; never-published documents get the placeholder
    pub fn format(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        match date {
            Some(date) => format_date(&date.with_timezone(&self.timezone), &self.language),
            None => self.placeholder.clone(),
        }
    }
}

/// Format a date in ISO 8601 for `<time datetime>` attributes
pub fn date_xml(date: Option<&DateTime<FixedOffset>>) -> String {
    date.map(|d| d.to_rfc3339()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::timestamp::parse;

    #[test]
    fn test_format_date_pt_br() {
        let date = parse("2021-03-15T19:25:28+0000").unwrap();
        assert_eq!(format_date(&date, "pt-BR"), "15 mar 2021");
    }

    #[test]
    fn test_format_date_en() {
        let date = parse("2021-05-01T10:00:00+0000").unwrap();
        assert_eq!(format_date(&date, "en"), "01 May 2021");
    }

    #[test]
    fn test_formatter_converts_timezone() {
        // 01:30 UTC is still the previous day in São Paulo
        let date = parse("2021-03-16T01:30:00+0000").unwrap();
        let formatter = DateFormatter::new("pt-BR", chrono_tz::America::Sao_Paulo, "-");
        assert_eq!(formatter.format(Some(&date)), "15 mar 2021");
    }

    #[test]
    fn test_formatter_placeholder_for_null_date() {
        let formatter = DateFormatter::new("pt-BR", chrono_tz::UTC, "Não publicado");
        assert_eq!(formatter.format(None), "Não publicado");
    }

    #[test]
    fn test_month_abbreviations() {
        let formatter = DateFormatter::new("pt-BR", chrono_tz::UTC, "-");
        let months = formatter.month_abbreviations();
        assert_eq!(months.len(), 12);
        assert_eq!(months[1], "fev");
        assert_eq!(months[2], "mar");

        let formatter = DateFormatter::new("en", chrono_tz::UTC, "-");
        assert_eq!(formatter.month_abbreviations()[4], "May");
    }

    #[test]
    fn test_date_xml() {
        let date = parse("2021-03-15T19:25:28+0000").unwrap();
        assert_eq!(date_xml(Some(&date)), "2021-03-15T19:25:28+00:00");
        assert_eq!(date_xml(None), "");
    }
}
