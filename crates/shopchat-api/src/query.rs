//! Server-side chat query parsing.
//!
//! Broader than the client's filter extraction: any catalog category, price
//! ceilings ("under", "below", "less than") and floors ("over", "above",
//! "more than").

use regex::Regex;
use std::sync::LazyLock;

use shopchat_core::types::Product;
use shopchat_storage::{ProductQuery, CATEGORIES};

static CEILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:under|below|less than) ([0-9]+)").expect("Invalid ceiling regex")
});

static FLOOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:over|above|more than) ([0-9]+)").expect("Invalid floor regex")
});

/// Reply when a chat query matches nothing.
pub const NO_MATCH_REPLY: &str = "No products found.";

/// Parse lowercased chat text into a catalog query capped at `limit` results.
pub fn parse_chat_query(text: &str, limit: u32) -> ProductQuery {
    let category = CATEGORIES
        .iter()
        .find(|c| text.contains(c.to_lowercase().as_str()))
        .map(|c| c.to_lowercase());

    ProductQuery {
        category,
        max_price: capture_number(&CEILING_RE, text),
        min_price: capture_number(&FLOOR_RE, text),
        limit: Some(limit),
    }
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| v.min(f64::MAX))
}

/// Bot reply naming the matched products.
pub fn chat_reply(products: &[Product]) -> String {
    if products.is_empty() {
        return NO_MATCH_REPLY.to_string();
    }
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    format!(
        "I found {} products matching your request: {}.",
        products.len(),
        names.join(", ")
    )
}

/// Bot reply logged for a plain product search.
pub fn search_log_reply(count: usize) -> String {
    if count == 0 {
        NO_MATCH_REPLY.to_string()
    } else {
        format!("{} products matched.", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopchat_core::types::ProductId;

    #[test]
    fn test_category_and_ceiling() {
        let q = parse_chat_query("cheap books under 800 please", 5);
        assert_eq!(q.category.as_deref(), Some("books"));
        assert_eq!(q.max_price, Some(800.0));
        assert_eq!(q.min_price, None);
        assert_eq!(q.limit, Some(5));
    }

    #[test]
    fn test_floor_and_ceiling_variants() {
        let q = parse_chat_query("shoes above 1000 and less than 3000", 5);
        assert_eq!(q.category.as_deref(), Some("shoes"));
        assert_eq!(q.min_price, Some(1000.0));
        assert_eq!(q.max_price, Some(3000.0));

        let q = parse_chat_query("more than 250", 5);
        assert_eq!(q.min_price, Some(250.0));
        assert_eq!(q.category, None);
    }

    #[test]
    fn test_first_listed_category_wins() {
        let q = parse_chat_query("electronics or home goods", 5);
        assert_eq!(q.category.as_deref(), Some("electronics"));
    }

    #[test]
    fn test_keyword_needs_adjacent_number() {
        let q = parse_chat_query("under budget 500", 5);
        assert_eq!(q.max_price, None);
    }

    #[test]
    fn test_oversized_bound_saturates() {
        let q = parse_chat_query(&format!("books under {}", "9".repeat(400)), 5);
        assert_eq!(q.max_price, Some(f64::MAX));
    }

    #[test]
    fn test_replies() {
        assert_eq!(chat_reply(&[]), "No products found.");
        let products = vec![
            Product {
                id: ProductId(1),
                name: "Amber Ridge".into(),
                category: "Home".into(),
                price: 500.0,
                description: String::new(),
            },
            Product {
                id: ProductId(2),
                name: "Onyx Pine".into(),
                category: "Home".into(),
                price: 700.0,
                description: String::new(),
            },
        ];
        assert_eq!(
            chat_reply(&products),
            "I found 2 products matching your request: Amber Ridge, Onyx Pine."
        );
        assert_eq!(search_log_reply(3), "3 products matched.");
        assert_eq!(search_log_reply(0), "No products found.");
    }
}
