//! Detail-view selection: at most one product at a time.

use shopchat_core::types::{Product, ProductId};

/// The product currently shown in detail view, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    current: Option<Product>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `product`, replacing any previous selection.
    pub fn set(&mut self, product: Product) {
        self.current = Some(product);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Product> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn selected_id(&self) -> Option<ProductId> {
        self.current.as_ref().map(|p| p.id)
    }
}
