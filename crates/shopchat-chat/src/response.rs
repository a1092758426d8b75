//! Bot reply composition for product searches.

use shopchat_core::types::{Product, Turn};

/// Reply when a search returns nothing.
pub const NOT_FOUND_MESSAGE: &str = "No products found for your query.";

/// Count-bearing reply heading a product list.
pub fn summary_message(count: usize) -> String {
    format!("Here are {} product(s):", count)
}

/// Build the bot turn for a search result, keeping the catalog's ordering.
pub fn compose_reply(products: Vec<Product>) -> Turn {
    if products.is_empty() {
        Turn::bot(NOT_FOUND_MESSAGE, None)
    } else {
        Turn::bot(summary_message(products.len()), Some(products))
    }
}
