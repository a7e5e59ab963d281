// ============================================================
// Layer 4 — Lemma Stream Preprocessor
// ============================================================
// Cleans a joined lemma stream before it is cached and indexed.
//
// The cache format stores each page's content on a single line,
// so the output of `clean` must never contain a newline.
//
// Cleaning steps (applied in order):
//   1. Replace every character that is neither alphabetic nor a
//      digit with a plain space (newlines, punctuation, symbols)
//   2. Collapse runs of spaces into one
//   3. Trim the ends

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a lemma stream into single-space-separated tokens.
    pub fn clean(&self, text: &str) -> String {

        // ── Step 1: Keep only letters and digits ─────────────────────────────
        let step1: String = text
            .chars()
            .map(|c| if c.is_alphabetic() || c.is_numeric() { c } else { ' ' })
            .collect();

        // ── Step 2 + 3: Collapse spaces and trim ──────────────────────────────
        let mut out        = String::with_capacity(step1.len());
        let mut last_space = true;

        for c in step1.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("paris   capit"), "paris capit");
    }

    #[test]
    fn test_replaces_punctuation() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("-lrb- paris , franc -rrb-"), "lrb paris franc rrb");
    }

    #[test]
    fn test_output_is_single_line() {
        let p = Preprocessor::new();
        let cleaned = p.clean("line1\nline2\r\nline3");
        assert_eq!(cleaned, "line1 line2 line3");
        assert!(!cleaned.contains('\n'));
    }

    #[test]
    fn test_keeps_unicode_letters_and_digits() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("zürich 1848!"), "zürich 1848");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean(" ,. "), "");
    }
}
