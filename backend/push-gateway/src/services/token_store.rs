/// Device token registry
///
/// Handlers only see the `TokenStore` trait so the in-memory set can be
/// replaced by a persistent backend without touching the HTTP layer.
use async_trait::async_trait;
use dashmap::DashSet;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Add a token, returning the registry size afterwards
    async fn add(&self, token: String) -> usize;

    /// Remove a token if present, returning the registry size afterwards
    async fn remove(&self, token: &str) -> usize;

    /// Snapshot of all registered tokens, in no particular order
    async fn list(&self) -> Vec<String>;

    async fn len(&self) -> usize;
}

/// Process-lifetime token set. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: DashSet<String>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn add(&self, token: String) -> usize {
        self.tokens.insert(token);
        self.tokens.len()
    }

    async fn remove(&self, token: &str) -> usize {
        self.tokens.remove(token);
        self.tokens.len()
    }

    async fn list(&self) -> Vec<String> {
        self.tokens.iter().map(|entry| entry.key().clone()).collect()
    }

    async fn len(&self) -> usize {
        self.tokens.len()
    }
}
