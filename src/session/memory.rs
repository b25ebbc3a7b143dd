use crate::types::Token;

use super::TokenCache;

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenCache {
    token: Option<Token>,
}

impl MemoryTokenCache {
    pub fn new(token: Option<Token>) -> Self {
        Self { token }
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self) -> Option<Token> {
        self.token.clone()
    }

    fn set(&mut self, token: Token) {
        self.token = Some(token);
    }

    fn clear(&mut self) {
        self.token = None;
    }
}
