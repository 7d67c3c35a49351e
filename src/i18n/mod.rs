//! Internationalization (i18n) of the page labels
//!
//! Label tables for the supported languages are compiled into the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

const LANGUAGES: &[(&str, &str)] = &[
    ("en", include_str!("languages/en.yml")),
    ("pt-BR", include_str!("languages/pt-BR.yml")),
];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler with the built-in languages loaded
    pub fn new(language: &str) -> Result<Self> {
        let mut translations = HashMap::new();
        for (lang, source) in LANGUAGES {
            let data: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(source)?;
            translations.insert(lang.to_string(), data);
        }
        Ok(Self {
            language: language.to_string(),
            translations,
        })
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key
    /// Key can be nested like "not_found.title"
    pub fn get(&self, key: &str) -> String {
        if let Some(value) = self.lookup(&self.language, key) {
            return value;
        }

        // Fallback to English
        if let Some(value) = self.lookup("en", key) {
            return value;
        }

        // Return key as fallback
        key.to_string()
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<String> {
        let lang_data = self
            .translations
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(lang))
            .map(|(_, data)| data)?;
        get_nested_value(lang_data, key).map(yaml_value_to_string)
    }

    /// Labels used by the page templates
    pub fn labels(&self) -> Labels {
        Labels {
            home_title: self.get("home.title"),
            load_more: self.get("load_more"),
            loading: self.get("loading"),
            minutes: self.get("minutes"),
            not_found: self.get("not_found.title"),
            back_home: self.get("not_found.back"),
        }
    }
}

/// Translated strings handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub home_title: String,
    pub load_more: String,
    pub loading: String,
    pub minutes: String,
    pub not_found: String,
    pub back_home: String,
}

/// Get a nested value from translation data
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        current = current.as_mapping()?.get(part)?;
    }

    Some(current)
}

/// Convert YAML value to string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
