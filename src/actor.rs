//! The caller behind a request.

use crate::store::RequestContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub username: String,
    pub is_admin: bool,
    pub context: RequestContext,
}

impl Actor {
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
            context: RequestContext::default(),
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::user(username)
        }
    }

    pub fn is(&self, username: &str) -> bool {
        self.username == username
    }
}
