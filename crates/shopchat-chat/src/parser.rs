//! Filter extraction from free-text product questions.
//!
//! Recognizes exactly two cues: "under" followed anywhere by a bare number
//! (price ceiling) and "electronics" (category). Matching is substring based,
//! so "undertake" counts as "under".

use regex::Regex;
use std::sync::LazyLock;

use shopchat_core::types::FilterSet;

/// A token made only of ASCII decimal digits.
static DIGIT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid digit token regex"));

const PRICE_CEILING_KEYWORD: &str = "under";
const ELECTRONICS_KEYWORD: &str = "electronics";

/// Category value sent when the electronics keyword is present.
pub const ELECTRONICS_CATEGORY: &str = "Electronics";

/// Rule-based extractor turning a question into a [`FilterSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterExtractor;

impl FilterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every recognized filter. Never fails; unknown input yields an empty set.
    pub fn extract(&self, text: &str) -> FilterSet {
        let lower = text.to_lowercase();
        FilterSet {
            max_price: self.extract_max_price(text, &lower),
            category: self.extract_category(&lower),
        }
    }

    /// First bare-number token, provided the text mentions "under".
    /// Tokens too large for `f64` saturate to `f64::MAX`.
    fn extract_max_price(&self, text: &str, lower: &str) -> Option<f64> {
        if !lower.contains(PRICE_CEILING_KEYWORD) {
            return None;
        }
        text.split_whitespace()
            .find(|token| DIGIT_TOKEN_RE.is_match(token))
            .and_then(|token| token.parse::<f64>().ok())
            .map(|price| price.min(f64::MAX))
    }

    fn extract_category(&self, lower: &str) -> Option<String> {
        lower
            .contains(ELECTRONICS_KEYWORD)
            .then(|| ELECTRONICS_CATEGORY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> FilterSet {
        FilterExtractor::new().extract(text)
    }

    #[test]
    fn test_electronics_under_price() {
        let filters = extract("show me electronics under 500");
        assert_eq!(filters.max_price, Some(500.0));
        assert_eq!(filters.category.as_deref(), Some("Electronics"));
    }

    #[test]
    fn test_under_without_number_has_no_ceiling() {
        let filters = extract("anything under cheap");
        assert_eq!(filters, FilterSet::default());
    }

    #[test]
    fn test_no_keywords_is_unfiltered() {
        assert!(extract("hello there").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_number_without_under_is_ignored() {
        assert_eq!(extract("books for 300").max_price, None);
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let filters = extract("ELECTRONICS UNDER 300");
        assert_eq!(filters.max_price, Some(300.0));
        assert_eq!(filters.category.as_deref(), Some("Electronics"));

        assert_eq!(
            extract("Any Electronics?").category.as_deref(),
            Some("Electronics")
        );
    }

    #[test]
    fn test_substring_match_is_preserved() {
        // "undertake" contains "under"; the loose match is intentional.
        assert_eq!(extract("undertake 3 tasks").max_price, Some(3.0));
        assert_eq!(
            extract("consumerelectronicsstore").category.as_deref(),
            Some("Electronics")
        );
    }

    #[test]
    fn test_first_digit_token_wins_anywhere() {
        assert_eq!(extract("2 phones under 900").max_price, Some(2.0));
        assert_eq!(extract("under 100 or under 200").max_price, Some(100.0));
    }

    #[test]
    fn test_non_pure_digit_tokens_skipped() {
        assert_eq!(extract("under $500").max_price, None);
        assert_eq!(extract("under 12.50").max_price, None);
        assert_eq!(extract("under 500rs").max_price, None);
        assert_eq!(extract("under 1,000").max_price, None);
        assert_eq!(extract("under $500 or 700").max_price, Some(700.0));
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        assert_eq!(extract("under \u{0665}\u{0660}\u{0660}").max_price, None);
    }

    #[test]
    fn test_leading_zeros_and_whitespace() {
        assert_eq!(extract("under\t\t0500\n").max_price, Some(500.0));
    }

    #[test]
    fn test_very_long_number_still_parses() {
        let filters = extract("under 123456789012345678901234567890");
        assert!(filters.max_price.is_some());
        assert!(filters.max_price.unwrap() > 1e29);
    }

    #[test]
    fn test_oversized_number_saturates() {
        let text = format!("electronics under {}", "9".repeat(400));
        let filters = extract(&text);
        assert_eq!(filters.max_price, Some(f64::MAX));
        assert_eq!(filters.category.as_deref(), Some("Electronics"));

        // The query string must stay a finite, parseable number.
        let pairs = filters.to_query_pairs();
        let sent = pairs[1].1.parse::<f64>().unwrap();
        assert!(sent.is_finite());
        assert_eq!(sent, f64::MAX);
    }

    #[test]
    fn test_only_electronics_category_recognized() {
        assert_eq!(extract("books under 400").category, None);
        assert_eq!(extract("shoes").category, None);
    }
}
