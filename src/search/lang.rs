use serde::{Deserialize, Serialize};

/// Query language hint passed to the translation service.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ru,
    En,
    #[default]
    Auto,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
            Lang::Auto => "auto",
        }
    }

    /// Any Cyrillic character marks the text as Russian; everything else is treated as English.
    pub fn detect(text: &str) -> Lang {
        if contains_cyrillic(text) {
            Lang::Ru
        } else {
            Lang::En
        }
    }
}

fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0400}'..='\u{04FF}' |
            '\u{0500}'..='\u{052F}'
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_russian() {
        assert_eq!(Lang::detect("нейронные сети"), Lang::Ru);
        assert_eq!(Lang::detect("transformer нейронные"), Lang::Ru);
    }

    #[test]
    fn latin_text_is_english() {
        assert_eq!(Lang::detect("graph neural networks"), Lang::En);
        assert_eq!(Lang::detect(""), Lang::En);
    }

    #[test]
    fn codes() {
        assert_eq!(Lang::Ru.code(), "ru");
        assert_eq!(Lang::En.code(), "en");
        assert_eq!(Lang::Auto.code(), "auto");
    }

    #[test]
    fn lang_deserializes_from_json() {
        let ru: Lang = serde_json::from_str(r#""ru""#).unwrap();
        assert_eq!(ru, Lang::Ru);
        let auto: Lang = serde_json::from_str(r#""auto""#).unwrap();
        assert_eq!(auto, Lang::Auto);
    }
}
