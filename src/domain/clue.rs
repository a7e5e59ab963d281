// ============================================================
// Layer 3 — Clue Domain Type
// ============================================================
// One quiz item: a category, the clue text, and the title of the
// page that answers it.
//
// Example:
//   Category: NEWSPAPERS
//   Text:     "The dominant paper in our nation's capital..."
//   Answer:   The Washington Post

use serde::{Deserialize, Serialize};

use super::or_sentinel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub category: String,

    /// Raw clue text from the file, or its lemma stream once
    /// the pipeline has normalized it
    pub text: String,

    /// Expected page title. Compared after trimming.
    pub expected_answer: String,
}

impl Clue {
    pub fn new(
        category:        impl AsRef<str>,
        text:            impl AsRef<str>,
        expected_answer: impl AsRef<str>,
    ) -> Self {
        Self {
            category:        or_sentinel(category.as_ref()),
            text:            or_sentinel(text.as_ref()),
            // Kept untrimmed: the harness owns the trim contract
            expected_answer: if expected_answer.as_ref().trim().is_empty() {
                super::NULL_SENTINEL.to_string()
            } else {
                expected_answer.as_ref().to_string()
            },
        }
    }

    /// Returns a copy with the text replaced, e.g. by its lemma stream.
    /// An empty stream stays empty so the clue is skipped at search time.
    pub fn with_text(&self, text: impl AsRef<str>) -> Self {
        Self {
            category:        self.category.clone(),
            text:            text.as_ref().trim().to_string(),
            expected_answer: self.expected_answer.clone(),
        }
    }

    /// The answer key used for matching and in the position record.
    pub fn answer_key(&self) -> &str {
        self.expected_answer.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_is_trimmed() {
        let clue = Clue::new("CAPITALS", "city of light", "Paris ");
        assert_eq!(clue.expected_answer, "Paris ");
        assert_eq!(clue.answer_key(), "Paris");
    }

    #[test]
    fn test_with_text_keeps_answer() {
        let clue = Clue::new("CAPITALS", "The City of Light", "Paris");
        let lemmatized = clue.with_text("citi light");
        assert_eq!(lemmatized.text, "citi light");
        assert_eq!(lemmatized.expected_answer, "Paris");
        assert_eq!(lemmatized.category, "CAPITALS");
    }
}
