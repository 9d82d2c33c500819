//! Language code and name resolution.

use serde::{Deserialize, Serialize};

/// Language assumed when detection reports nothing.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// ISO-639-1 codes and display names the pipeline knows by name.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("he", "Hebrew"),
    ("ru", "Russian"),
    ("es", "Spanish"),
    ("ar", "Arabic"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("hi", "Hindi"),
    ("pl", "Polish"),
    ("uk", "Ukrainian"),
    ("tr", "Turkish"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
];

/// A language as the pipeline uses it downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLanguage {
    /// Code safe to forward as a `language` parameter, when known.
    pub code: Option<String>,
    /// Human-readable name.
    pub name: String,
}

impl ResolvedLanguage {
    /// The fallback language.
    pub fn default_language() -> Self {
        resolve_language(DEFAULT_LANGUAGE_CODE)
    }
}

/// Resolves a code (`"es"`) or a name (`"spanish"`) against the table.
///
/// Unknown values pass through title-cased. Only two-letter alphabetic
/// unknowns are kept as a forwardable code.
pub fn resolve_language(raw: &str) -> ResolvedLanguage {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();

    if let Some((code, name)) = SUPPORTED_LANGUAGES
        .iter()
        .find(|(code, name)| *code == lower || name.to_lowercase() == lower)
    {
        return ResolvedLanguage {
            code: Some((*code).to_string()),
            name: (*name).to_string(),
        };
    }

    let looks_like_code = lower.len() == 2 && lower.chars().all(|c| c.is_ascii_alphabetic());
    ResolvedLanguage {
        code: looks_like_code.then(|| lower.clone()),
        name: title_case(trimmed),
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
