//! Shared domain types: products, transcript turns, and search filters.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// Catalog-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id)
    }
}

/// A catalog product. The catalog owns these; sessions only hold copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Turn
// =============================================================================

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub sender: Sender,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

impl Turn {
    /// A user-authored turn carrying the raw input text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            products: None,
        }
    }

    /// A bot-authored turn. An empty product list is stored as absent.
    pub fn bot(text: impl Into<String>, products: Option<Vec<Product>>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            products: products.filter(|p| !p.is_empty()),
        }
    }

    /// Products embedded in this turn, or an empty slice.
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }

    /// A bot turn must carry text or at least one product.
    pub fn is_well_formed(&self) -> bool {
        match self.sender {
            Sender::User => true,
            Sender::Bot => !self.text.is_empty() || !self.products().is_empty(),
        }
    }
}

// =============================================================================
// FilterSet
// =============================================================================

/// Structured constraints derived from a free-text query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FilterSet {
    /// True when no constraint is set (an unfiltered catalog listing).
    pub fn is_empty(&self) -> bool {
        self.max_price.is_none() && self.category.is_none()
    }

    /// Query-string pairs in the order the catalog expects them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref category) = self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        pairs
    }
}
