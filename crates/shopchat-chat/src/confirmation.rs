//! User confirmation for destructive session actions.
//!
//! The gate is a blocking yes/no question; front ends supply the
//! implementation (a terminal prompt, a dialog, a fixed answer in tests).

/// Question asked before the conversation is reset.
pub const RESET_PROMPT: &str = "Are you sure you want to reset the chat?";

/// Blocking yes/no confirmation.
pub trait ConfirmationGate: Send + Sync {
    /// Ask the user `prompt`; `true` means proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Gate that always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer {
    approve: bool,
}

impl FixedAnswer {
    pub fn approve() -> Self {
        Self { approve: true }
    }

    pub fn decline() -> Self {
        Self { approve: false }
    }
}

impl ConfirmationGate for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.approve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_fixed_answers() {
        assert!(FixedAnswer::approve().confirm(RESET_PROMPT));
        assert!(!FixedAnswer::decline().confirm(RESET_PROMPT));
    }

    #[test]
    fn test_closure_gate_sees_prompt() {
        let seen = Mutex::new(Vec::new());
        let gate = |prompt: &str| {
            seen.lock().unwrap().push(prompt.to_string());
            false
        };
        assert!(!gate.confirm(RESET_PROMPT));
        assert_eq!(seen.lock().unwrap().as_slice(), [RESET_PROMPT.to_string()]);
    }
}
