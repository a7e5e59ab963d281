// ============================================================
// Layer 5 — Snowball Normalizer
// ============================================================
// Tokenizes text, drops non-content words when asked to, and
// reduces every surviving token to its Snowball (English) stem.
//
// Content-word filtering keeps nouns, verbs and adjectives. There
// is no tagger here, so the filter works the other way round: it
// removes the closed word classes (determiners, pronouns,
// prepositions, conjunctions, auxiliaries and modals, common
// adverbs) plus purely numeric tokens.
//
// Example:
//   "The cities were founded by the Romans in 52 BC"
//   All          → the citi were found by the roman in 52 bc
//   ContentWords → citi found roman bc

use std::collections::HashSet;
use std::sync::LazyLock;

use rust_stemmers::{Algorithm, Stemmer};

use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::{PosFilter, TextNormalizer};

static FUNCTION_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // determiners
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "either",
        "neither", "some", "any", "no", "all", "both", "another", "such", "what", "which",
        "whose", "whatever", "whichever",
        // pronouns
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves",
        "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself",
        "we", "us", "our", "ours", "ourselves", "they", "them", "their", "theirs",
        "themselves", "who", "whom", "one", "oneself", "something", "anything", "nothing",
        "everything", "someone", "anyone", "everyone",
        // prepositions
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
        "out", "off", "over", "under", "upon", "within", "without", "along", "across",
        "behind", "beyond", "among", "around", "near", "toward", "towards", "onto", "via",
        "per", "than", "like", "since", "until", "till",
        // conjunctions
        "and", "or", "but", "nor", "so", "yet", "if", "because", "although", "though",
        "while", "whereas", "unless", "whether", "as",
        // auxiliaries and modals
        "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had",
        "having", "do", "does", "did", "doing", "will", "would", "shall", "should", "can",
        "could", "may", "might", "must", "ought",
        // adverbs and particles
        "not", "very", "too", "also", "just", "only", "then", "there", "here", "when",
        "where", "why", "how", "again", "further", "once", "more", "most", "less", "least",
        "now", "even", "still", "already", "often", "always", "never", "ever", "soon",
        "however", "thus", "therefore", "rather", "quite", "almost", "perhaps",
    ]
    .into_iter()
    .collect()
});

/// English Snowball stemmer behind the `TextNormalizer` trait.
pub struct SnowballNormalizer {
    stemmer: Stemmer,
}

impl SnowballNormalizer {
    pub fn new() -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English) }
    }

    fn keeps(token: &str, filter: PosFilter) -> bool {
        match filter {
            PosFilter::All => true,
            PosFilter::ContentWords => {
                !FUNCTION_WORDS.contains(token) && !token.chars().all(|c| c.is_numeric())
            }
        }
    }
}

impl Default for SnowballNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer for SnowballNormalizer {
    fn lemmatize(&self, text: &str, filter: PosFilter) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|raw| !raw.is_empty())
            .map(str::to_lowercase)
            .filter(|token| Self::keeps(token, filter))
            .map(|token| self.stemmer.stem(&token).into_owned())
            .collect()
    }
}

/// Lemmatize `text` and return the cleaned, space-joined lemma stream.
pub fn lemmatize_text<N>(normalizer: &N, text: &str, filter: PosFilter) -> String
where
    N: TextNormalizer + ?Sized,
{
    let lemmas = normalizer.lemmatize(text, filter);
    Preprocessor::new().clean(&lemmas.join(" "))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keeps_every_token() {
        let n = SnowballNormalizer::new();
        let lemmas = n.lemmatize("The cats of Paris", PosFilter::All);
        assert_eq!(lemmas, vec!["the", "cat", "of", "pari"]);
    }

    #[test]
    fn test_content_words_drop_function_words_and_numbers() {
        let n = SnowballNormalizer::new();
        let lemmas = n.lemmatize("The Romans were founding it in 52 BC", PosFilter::ContentWords);
        assert_eq!(lemmas, vec!["roman", "found", "bc"]);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        let n = SnowballNormalizer::new();
        let lemmas = n.lemmatize("rock-and-roll, (music)!", PosFilter::All);
        assert_eq!(lemmas, vec!["rock", "and", "roll", "music"]);
    }

    #[test]
    fn test_same_stem_for_inflections() {
        let n = SnowballNormalizer::new();
        let a = n.lemmatize("running", PosFilter::All);
        let b = n.lemmatize("runs", PosFilter::All);
        let c = n.lemmatize("run", PosFilter::All);
        assert_eq!(a, c);
        assert_eq!(b, c);
    }

    #[test]
    fn test_lemmatize_text_is_one_clean_line() {
        let n = SnowballNormalizer::new();
        let text = lemmatize_text(&n, "Paris,\nthe capital\tof France.", PosFilter::ContentWords);
        assert_eq!(text, "pari capit franc");
    }

    #[test]
    fn test_empty_text() {
        let n = SnowballNormalizer::new();
        assert!(n.lemmatize("", PosFilter::All).is_empty());
        assert_eq!(lemmatize_text(&n, " ... ", PosFilter::All), "");
    }
}
