pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::ShopchatConfig;
pub use credentials::{current_user, login, CredentialStore, MemoryCredentialStore};
pub use error::{Result, ShopchatError};
pub use types::*;
