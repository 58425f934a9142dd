//! Diacritic-insensitive text matching for the search filters.
//!
//! A query matches when every whitespace-separated token of it occurs in the
//! target text, after both sides are NFD-decomposed, stripped of combining
//! marks, and lowercased. Tokens are matched literally by scanning; no
//! dynamic patterns are built, so a token like `c++` needs no escaping.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block (U+0300..=U+036F).
#[inline]
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Decompose, drop combining marks, lowercase, trim.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Does `text` satisfy the search `query`?
///
/// An empty query matches everything. Otherwise every token of the
/// normalized query must occur in the normalized text as a substring — an
/// occurrence anywhere counts, word boundary or not.
pub fn matches_query(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let text = normalize(text);
    let query = normalize(query);

    query
        .split_whitespace()
        .all(|token| text.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_anything() {
        assert!(matches_query("anything", ""));
        assert!(matches_query("", ""));
    }

    #[test]
    fn diacritics_are_ignored_both_ways() {
        assert!(matches_query("Déjà Vu", "deja"));
        assert!(matches_query("deja vu", "Déjà"));
    }

    #[test]
    fn case_is_ignored() {
        assert!(matches_query("Rust And WebAssembly", "rust webassembly"));
    }

    #[test]
    fn substring_matches_without_word_boundary() {
        assert!(matches_query("foobar", "bar"));
    }

    #[test]
    fn every_token_must_match() {
        assert!(matches_query("learning rust today", "rust today"));
        assert!(!matches_query("learning rust today", "rust tomorrow"));
    }

    #[test]
    fn regex_special_characters_are_literal() {
        assert!(matches_query("tips for c++ beginners", "c++"));
        assert!(!matches_query("tips for cpp beginners", "c++"));
        assert!(matches_query("a (live) set", "(live)"));
    }

    #[test]
    fn whitespace_only_query_matches_everything() {
        // Normalizing trims it down to no tokens at all.
        assert!(matches_query("anything", "   "));
    }
}
