// ============================================================
// Layer 3 — Page Domain Type
// ============================================================
// One encyclopedia page after lemmatization. The title is kept
// verbatim (it is what answers are compared against); only the
// content is a lemma stream.
//
// Missing fields are replaced with NULL_SENTINEL at construction
// so the index builder and the cache writer never see an empty
// field.

use serde::{Deserialize, Serialize};

use super::or_sentinel;

/// A corpus page ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page title without the `[[ ]]` brackets
    pub title: String,

    /// Category line text, or "NULL"
    pub category: String,

    /// Space-separated lemma tokens, or "NULL"
    pub content: String,
}

impl Page {
    /// Create a new Page, substituting the sentinel for blank fields.
    ///
    /// Example:
    ///   let page = Page::new("Paris", "Capitals in Europe", "paris capit franc");
    pub fn new(
        title:    impl AsRef<str>,
        category: impl AsRef<str>,
        content:  impl AsRef<str>,
    ) -> Self {
        Self {
            title:    or_sentinel(title.as_ref()),
            category: or_sentinel(category.as_ref()),
            content:  or_sentinel(content.as_ref()),
        }
    }
}

/// A page as it appears in the raw corpus, before lemmatization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    pub title:    String,
    pub category: Option<String>,
    /// Non-empty body lines joined by single spaces
    pub text:     String,
}

impl RawPage {
    /// Attach lemmatized content, producing the indexable Page.
    pub fn into_page(self, content: impl AsRef<str>) -> Page {
        Page::new(&self.title, self.category.as_deref().unwrap_or(""), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NULL_SENTINEL;

    #[test]
    fn test_blank_fields_become_sentinel() {
        let page = Page::new("Paris", "", "  ");
        assert_eq!(page.title, "Paris");
        assert_eq!(page.category, NULL_SENTINEL);
        assert_eq!(page.content, NULL_SENTINEL);
    }

    #[test]
    fn test_raw_page_without_category() {
        let raw = RawPage {
            title:    "Paris".to_string(),
            category: None,
            text:     "Paris is the capital of France.".to_string(),
        };
        let page = raw.into_page("paris capit franc");
        assert_eq!(page.category, NULL_SENTINEL);
        assert_eq!(page.content, "paris capit franc");
    }

    #[test]
    fn test_title_is_trimmed() {
        let page = Page::new(" Rome ", "Capitals", "rome");
        assert_eq!(page.title, "Rome");
    }
}
