use super::translate::QueryTranslator;
use crate::translation::TranslationClient;

/// Lowercases, replaces everything except word characters, whitespace, and `-`
/// with a space, then collapses whitespace.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A user query with its derived forms. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    normalized: String,
    translated: String,
}

impl SearchQuery {
    pub async fn resolve<C: TranslationClient>(raw: &str, translator: &QueryTranslator<C>) -> Self {
        let normalized = normalize(raw);
        let translated = translator.translate(&normalized).await;
        Self {
            raw: raw.to_string(),
            normalized,
            translated,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn translated(&self) -> &str {
        &self.translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::translate::PhraseTranslator;
    use crate::translation::LibreTranslateClient;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Quantum  Computing!!"), "quantum computing");
        assert_eq!(normalize("  Машинное, обучение?  "), "машинное обучение");
    }

    #[test]
    fn keeps_hyphens_and_underscores() {
        assert_eq!(normalize("self-attention snake_case"), "self-attention snake_case");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("a\t\tb \n c"), "a b c");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!.,"), "");
    }

    #[test]
    fn idempotent() {
        for input in [
            "Deep Learning: A Survey (2nd ed.)",
            "Квантовые вычисления & ML",
            "İstanbul C++ x^2",
            "already normalized text",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }

    #[tokio::test]
    async fn resolve_keeps_all_forms() {
        let translator: QueryTranslator<LibreTranslateClient> =
            QueryTranslator::Phrase(PhraseTranslator::new());
        let query = SearchQuery::resolve("Машинное обучение!", &translator).await;
        assert_eq!(query.raw(), "Машинное обучение!");
        assert_eq!(query.normalized(), "машинное обучение");
        assert_eq!(query.translated(), "machine learning");
    }
}
