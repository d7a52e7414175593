use futures::future::join_all;
use tracing::{debug, warn};

use super::Lang;
use super::query::normalize;
use crate::config::TranslatorMode;
use crate::translation::{LibreTranslateClient, TranslationClient};

/// Russian research terms and their English equivalents. Keys are already normalized.
pub const DICTIONARY: &[(&str, &str)] = &[
    ("квантовые вычисления", "quantum computing"),
    ("искусственный интеллект", "artificial intelligence"),
    ("машинное обучение", "machine learning"),
    ("нейронные сети", "neural networks"),
    ("глубокое обучение", "deep learning"),
    ("обработка данных", "data processing"),
    ("анализ данных", "data analysis"),
    ("компьютерное зрение", "computer vision"),
    ("обработка языка", "natural language processing"),
    ("робототехника", "robotics"),
    ("кибербезопасность", "cybersecurity"),
    ("большие данные", "big data"),
    ("облачные вычисления", "cloud computing"),
    ("интернет вещей", "internet of things"),
    ("блокчейн", "blockchain"),
    ("квантовая физика", "quantum physics"),
    ("теория относительности", "relativity theory"),
    ("молекулярная биология", "molecular biology"),
    ("генетика", "genetics"),
    ("нанотехнологии", "nanotechnology"),
    ("вычисления", "computing"),
    ("обучение", "learning"),
];

fn lookup(token: &str) -> Option<&'static str> {
    DICTIONARY
        .iter()
        .find(|(ru, _)| *ru == token)
        .map(|(_, en)| *en)
}

/// Substitutes dictionary phrases anywhere in the text, longest phrase first,
/// so `машинное обучение` wins over `обучение`.
#[derive(Debug, Clone)]
pub struct PhraseTranslator {
    entries: Vec<(&'static str, &'static str)>,
}

impl PhraseTranslator {
    pub fn new() -> Self {
        let mut entries = DICTIONARY.to_vec();
        entries.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        Self { entries }
    }

    pub fn translate(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (ru, en)| {
                if acc.contains(ru) {
                    acc.replace(ru, en)
                } else {
                    acc
                }
            })
    }
}

impl Default for PhraseTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// Looks up each whitespace token; Russian tokens missing from the dictionary
/// go to the translation service one at a time.
#[derive(Debug, Clone)]
pub struct TokenTranslator<C> {
    client: Option<C>,
}

impl<C: TranslationClient> TokenTranslator<C> {
    pub fn new(client: Option<C>) -> Self {
        Self { client }
    }

    pub async fn translate(&self, text: &str) -> String {
        let tokens = text.split_whitespace().map(|token| self.translate_token(token));
        join_all(tokens).await.join(" ")
    }

    async fn translate_token(&self, token: &str) -> String {
        if let Some(en) = lookup(token) {
            return en.to_string();
        }
        let Some(client) = &self.client else {
            return token.to_string();
        };
        if Lang::detect(token) != Lang::Ru {
            return token.to_string();
        }
        match client.translate(token, Lang::Ru, Lang::En).await {
            Ok(en) => {
                let en = normalize(&en);
                if en.is_empty() {
                    token.to_string()
                } else {
                    en
                }
            }
            Err(e) => {
                warn!(token, error = %e, "token translation failed, passing through");
                token.to_string()
            }
        }
    }
}

/// Translation strategy selected by `TranslatorMode`.
#[derive(Debug, Clone)]
pub enum QueryTranslator<C = LibreTranslateClient> {
    Phrase(PhraseTranslator),
    Token(TokenTranslator<C>),
}

impl<C: TranslationClient> QueryTranslator<C> {
    pub fn from_mode(mode: TranslatorMode, client: Option<C>) -> Self {
        match mode {
            TranslatorMode::Phrase => QueryTranslator::Phrase(PhraseTranslator::new()),
            TranslatorMode::Token => QueryTranslator::Token(TokenTranslator::new(client)),
        }
    }

    /// Best-effort English rendering of an already normalized query. Never fails.
    pub async fn translate(&self, normalized: &str) -> String {
        let translated = match self {
            QueryTranslator::Phrase(t) => t.translate(normalized),
            QueryTranslator::Token(t) => t.translate(normalized).await,
        };
        if translated != normalized {
            debug!(from = normalized, to = %translated, "query translated");
        }
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::TranslationError;
    use std::sync::Mutex;

    struct MockTranslation {
        reply: Result<&'static str, ()>,
        calls: Mutex<Vec<String>>,
    }

    impl MockTranslation {
        fn replying(text: &'static str) -> Self {
            Self {
                reply: Ok(text),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TranslationClient for &MockTranslation {
        async fn translate(
            &self,
            text: &str,
            source: Lang,
            target: Lang,
        ) -> Result<String, TranslationError> {
            assert_eq!((source, target), (Lang::Ru, Lang::En));
            self.calls.lock().unwrap().push(text.to_string());
            self.reply
                .map(String::from)
                .map_err(|_| TranslationError::Empty)
        }
    }

    #[test]
    fn dictionary_keys_are_normalized() {
        for (ru, _) in DICTIONARY {
            assert_eq!(normalize(ru), *ru);
        }
    }

    #[test]
    fn phrase_mode_translates_known_terms() {
        let t = PhraseTranslator::new();
        assert_eq!(t.translate("квантовые вычисления"), "quantum computing");
        assert_eq!(
            t.translate("нейронные сети для генетика"),
            "neural networks для genetics"
        );
    }

    #[test]
    fn phrase_mode_prefers_longest_match() {
        let t = PhraseTranslator::new();
        assert_eq!(t.translate("машинное обучение"), "machine learning");
        assert_eq!(t.translate("облачные вычисления"), "cloud computing");
        assert_eq!(t.translate("обучение с подкреплением"), "learning с подкреплением");
    }

    #[test]
    fn phrase_mode_passes_english_through() {
        let t = PhraseTranslator::new();
        assert_eq!(t.translate("graph neural networks"), "graph neural networks");
        assert_eq!(t.translate(""), "");
    }

    #[tokio::test]
    async fn token_mode_uses_dictionary_then_client() {
        let mock = MockTranslation::replying("reinforcement");
        let t = TokenTranslator::new(Some(&mock));
        let out = t.translate("обучение подкреплением transformer").await;
        assert_eq!(out, "learning reinforcement transformer");
        assert_eq!(mock.calls(), vec!["подкреплением".to_string()]);
    }

    #[tokio::test]
    async fn token_mode_normalizes_client_output() {
        let mock = MockTranslation::replying("Reinforcement.");
        let t = TokenTranslator::new(Some(&mock));
        assert_eq!(t.translate("подкреплением").await, "reinforcement");

        let blank = MockTranslation::replying("?!");
        let t = TokenTranslator::new(Some(&blank));
        assert_eq!(t.translate("подкреплением").await, "подкреплением");
    }

    #[tokio::test]
    async fn token_mode_passes_through_on_failure() {
        let mock = MockTranslation::failing();
        let t = TokenTranslator::new(Some(&mock));
        assert_eq!(t.translate("графовые сети").await, "графовые сети");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn token_mode_without_client_passes_through() {
        let t: TokenTranslator<LibreTranslateClient> = TokenTranslator::new(None);
        assert_eq!(t.translate("генетика растений").await, "genetics растений");
    }

    #[tokio::test]
    async fn token_mode_does_not_match_multiword_phrases() {
        let t: TokenTranslator<LibreTranslateClient> = TokenTranslator::new(None);
        assert_eq!(t.translate("машинное обучение").await, "машинное learning");
    }

    #[tokio::test]
    async fn from_mode_selects_variant() {
        let phrase: QueryTranslator = QueryTranslator::from_mode(TranslatorMode::Phrase, None);
        assert!(matches!(phrase, QueryTranslator::Phrase(_)));
        assert_eq!(phrase.translate("большие данные").await, "big data");

        let token: QueryTranslator = QueryTranslator::from_mode(TranslatorMode::Token, None);
        assert!(matches!(token, QueryTranslator::Token(_)));
    }
}
