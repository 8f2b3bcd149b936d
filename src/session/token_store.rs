//! Durable storage for the bearer token.

use std::fmt;
use std::sync::RwLock;

use crate::errors::{Result, TravelBookError};

/// Where the bearer token lives between requests
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// The stored token, if any
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn save(&self, token: &str) -> Result<()>;

    /// Forget the stored token
    fn clear(&self) -> Result<()>;
}

/// Token held in process memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

fn poisoned() -> TravelBookError {
    TravelBookError::internal("token store lock poisoned")
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.write().map_err(|_| poisoned())? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}
