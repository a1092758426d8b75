//! Chat session controller.
//!
//! Owns one session's transcript, detail-view selection and input draft, and
//! routes every mutation through four operations: query dispatch, product
//! selection, detail close and reset.
//!
//! Methods take `&self` and never hold the state lock across an `.await`, so
//! overlapping requests on one session interleave: each user turn is recorded
//! immediately and each bot turn lands whenever its search resolves.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use uuid::Uuid;

use shopchat_core::types::{Product, ProductId, Turn};

use crate::catalog::CatalogService;
use crate::confirmation::{ConfirmationGate, RESET_PROMPT};
use crate::context::ConversationStore;
use crate::error::ChatError;
use crate::parser::FilterExtractor;
use crate::response::compose_reply;
use crate::selection::Selection;

/// Everything a front end renders for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub conversation: ConversationStore,
    pub selection: Selection,
    /// Pending, unsent input.
    pub draft: String,
}

/// Result of a reset attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Confirmed and applied both remotely and locally.
    Reset,
    /// The user said no; nothing changed.
    Declined,
}

/// Single-user chat session over a catalog service.
pub struct ChatSession {
    id: Uuid,
    user: String,
    catalog: Arc<dyn CatalogService>,
    confirmation: Arc<dyn ConfirmationGate>,
    extractor: FilterExtractor,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Create an empty session for `user`.
    pub fn new(
        user: impl Into<String>,
        catalog: Arc<dyn CatalogService>,
        confirmation: Arc<dyn ConfirmationGate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            catalog,
            confirmation,
            extractor: FilterExtractor::new(),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    // -----------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------

    /// Copy of the current session state.
    pub fn snapshot(&self) -> Result<SessionState, ChatError> {
        self.with_state(|state| state.clone())
    }

    /// Copy of the transcript in display order.
    pub fn turns(&self) -> Result<Vec<Turn>, ChatError> {
        self.with_state(|state| state.conversation.turns().to_vec())
    }

    /// Product currently in detail view.
    pub fn selected(&self) -> Result<Option<Product>, ChatError> {
        self.with_state(|state| state.selection.current().cloned())
    }

    pub fn draft(&self) -> Result<String, ChatError> {
        self.with_state(|state| state.draft.clone())
    }

    pub fn set_draft(&self, text: impl Into<String>) -> Result<(), ChatError> {
        let text = text.into();
        self.with_state(|state| state.draft = text)
    }

    // -----------------------------------------------------------------
    // Hydration
    // -----------------------------------------------------------------

    /// Load the stored transcript from the catalog service.
    ///
    /// On failure the transcript stays as it was and the error is logged.
    pub async fn hydrate(&self) -> Result<usize, ChatError> {
        let turns = match self.catalog.list_conversation().await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(session = %self.id, error = %e, "Failed to load conversation history");
                return Err(e.into());
            }
        };
        let kept = self.with_state(|state| state.conversation.replace_with(turns))?;
        info!(session = %self.id, turns = kept, "Conversation history loaded");
        Ok(kept)
    }

    // -----------------------------------------------------------------
    // Query dispatch
    // -----------------------------------------------------------------

    /// Handle a user question.
    ///
    /// Blank input is dropped without touching state or the catalog. Otherwise
    /// the user turn is appended at once; when the search succeeds the bot
    /// reply is appended, the draft is cleared and any open detail view is
    /// closed. When the search fails the failure is only logged and the user
    /// turn is left unanswered.
    pub async fn handle_user_query(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            debug!(session = %self.id, "Ignoring blank message");
            return Err(ChatError::EmptyMessage);
        }

        self.with_state(|state| state.conversation.append(Turn::user(text)))??;

        let filters = self.extractor.extract(text);
        debug!(session = %self.id, ?filters, "Extracted filters");

        let products = match self.catalog.search_products(&filters).await {
            Ok(products) => products,
            Err(e) => {
                warn!(session = %self.id, error = %e, "Product search failed");
                return Err(e.into());
            }
        };

        let count = products.len();
        let reply = compose_reply(products);
        self.with_state(|state| -> Result<(), ChatError> {
            state.conversation.append(reply)?;
            state.draft.clear();
            state.selection.clear();
            Ok(())
        })??;

        info!(session = %self.id, results = count, "Answered query");
        Ok(())
    }

    /// Send whatever is in the draft buffer.
    pub async fn send_draft(&self) -> Result<(), ChatError> {
        let text = self.draft()?;
        self.handle_user_query(&text).await
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    /// Open the detail view for a product listed in a bot turn.
    pub async fn select_product(&self, product: &Product) -> Result<(), ChatError> {
        self.open_detail(product.id).await
    }

    /// Fetch the full record for `id` and show it.
    ///
    /// A failed fetch leaves the current selection untouched.
    pub async fn open_detail(&self, id: ProductId) -> Result<(), ChatError> {
        let product = match self.catalog.get_product(id).await {
            Ok(product) => product,
            Err(e) => {
                warn!(session = %self.id, product_id = %id, error = %e, "Product detail fetch failed");
                return Err(e.into());
            }
        };
        self.with_state(|state| state.selection.set(product))?;
        debug!(session = %self.id, product_id = %id, "Detail view opened");
        Ok(())
    }

    pub fn close_detail(&self) -> Result<(), ChatError> {
        self.with_state(|state| state.selection.clear())
    }

    // -----------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------

    /// Reset the conversation after explicit confirmation.
    ///
    /// Local state is cleared only after the catalog acknowledges the reset,
    /// so a failed request leaves everything as it was.
    pub async fn reset(&self) -> Result<ResetOutcome, ChatError> {
        if !self.confirmation.confirm(RESET_PROMPT) {
            debug!(session = %self.id, "Reset declined");
            return Ok(ResetOutcome::Declined);
        }

        if let Err(e) = self.catalog.reset_session().await {
            warn!(session = %self.id, error = %e, "Error resetting chat");
            return Err(e.into());
        }

        self.with_state(|state| {
            state.conversation.clear();
            state.selection.clear();
        })?;
        info!(session = %self.id, "Chat reset");
        Ok(ResetOutcome::Reset)
    }

    // -- Private helpers --

    fn with_state<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> Result<T, ChatError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ChatError::StatePoisoned(e.to_string()))?;
        Ok(f(&mut state))
    }
}

// =============================================================================
// Tests
// =============================================================================
