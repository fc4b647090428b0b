//! Per-user profile kept alongside the memory store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::memory_types::Metadata;

/// Identity and preferences of the user a brain belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
            preferences: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
        self.touch();
    }

    /// Store a preference such as an answer style; replaces any previous value.
    pub fn set_preference(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.preferences.insert(key.into(), value.into());
        self.touch();
    }

    pub fn preference(&self, key: &str) -> Option<&Value> {
        self.preferences.get(key)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
