//! Conversation transcript.
//!
//! Turns are append-only during a session and render in insertion order.
//! The whole transcript is replaced on hydration and cleared on reset.

use shopchat_core::types::{Sender, Turn};
use tracing::warn;

use crate::error::ChatError;

/// Ordered, append-only transcript of a chat session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. Bot turns with neither text nor products are refused.
    pub fn append(&mut self, turn: Turn) -> Result<(), ChatError> {
        if !turn.is_well_formed() {
            return Err(ChatError::InvalidTurn(
                "bot turn has neither text nor products".to_string(),
            ));
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Replace the transcript with turns loaded from the catalog service.
    ///
    /// Malformed turns are dropped. Returns the number of turns kept.
    pub fn replace_with(&mut self, turns: Vec<Turn>) -> usize {
        let total = turns.len();
        self.turns = turns.into_iter().filter(Turn::is_well_formed).collect();
        let dropped = total - self.turns.len();
        if dropped > 0 {
            warn!(dropped, "Dropped malformed turns from loaded history");
        }
        self.turns.len()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Most recent bot turn that lists products.
    pub fn last_product_listing(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.sender == Sender::Bot && !t.products().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopchat_core::types::{Product, ProductId};

    fn product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Item {}", id),
            category: "Books".to_string(),
            price: 300.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("hello")).unwrap();
        store
            .append(Turn::bot("Here are 1 product(s):", Some(vec![product(1)])))
            .unwrap();
        store.append(Turn::user("again")).unwrap();

        let senders: Vec<Sender> = store.turns().iter().map(|t| t.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot, Sender::User]);
        assert_eq!(store.last().unwrap().text, "again");
    }

    #[test]
    fn test_append_rejects_empty_bot_turn() {
        let mut store = ConversationStore::new();
        let result = store.append(Turn::bot("", None));
        assert!(matches!(result, Err(ChatError::InvalidTurn(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_with_drops_malformed() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("old")).unwrap();

        let kept = store.replace_with(vec![
            Turn::user("category=Electronics"),
            Turn::bot("", None),
            Turn::bot("3 products matched.", None),
        ]);
        assert_eq!(kept, 2);
        assert_eq!(store.turns()[0].text, "category=Electronics");
        assert_eq!(store.turns()[1].text, "3 products matched.");
    }

    #[test]
    fn test_clear() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("a")).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_last_product_listing_skips_text_only_turns() {
        let mut store = ConversationStore::new();
        store
            .append(Turn::bot("Here are 2 product(s):", Some(vec![product(1), product(2)])))
            .unwrap();
        store
            .append(Turn::bot("No products found for your query.", None))
            .unwrap();
        store.append(Turn::user("hmm")).unwrap();

        let listing = store.last_product_listing().unwrap();
        assert_eq!(listing.products().len(), 2);
    }

    #[test]
    fn test_last_product_listing_none_when_empty() {
        assert!(ConversationStore::new().last_product_listing().is_none());
    }
}
