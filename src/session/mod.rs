// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Session-scoped state
//!
//! Credentials live only for the duration of a session: loaded once at
//! startup, written back on every change, gone when the session ends. The
//! storage seam is a trait so the workbench never touches ambient globals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::llm::provider::Provider;

/// Fixed name the credential set is stored under
pub const API_KEYS_STORAGE_KEY: &str = "apiKeys";

/// Key-value storage scoped to one session
pub trait SessionStorage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory session storage, cleared when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// The credential set: at most one secret per provider.
///
/// One field per known provider, so a lookup can never miss a variant.
/// Serialized under the providers' display names, matching the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "Google Gemini", skip_serializing_if = "Option::is_none")]
    google_gemini: Option<String>,

    #[serde(rename = "OpenAI", skip_serializing_if = "Option::is_none")]
    openai: Option<String>,

    #[serde(rename = "Open Router", skip_serializing_if = "Option::is_none")]
    open_router: Option<String>,
}

impl ApiKeys {
    /// Credential for a provider, if one is saved
    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::GoogleGemini => self.google_gemini.as_deref(),
            Provider::OpenAI => self.openai.as_deref(),
            Provider::OpenRouter => self.open_router.as_deref(),
        }
    }

    /// Save a credential; an empty key clears the entry
    pub fn set(&mut self, provider: Provider, key: impl Into<String>) {
        let key = key.into();
        let slot = match provider {
            Provider::GoogleGemini => &mut self.google_gemini,
            Provider::OpenAI => &mut self.openai,
            Provider::OpenRouter => &mut self.open_router,
        };
        *slot = if key.trim().is_empty() {
            None
        } else {
            Some(key)
        };
    }

    /// Load the credential set from session storage.
    ///
    /// Missing or unreadable stored JSON falls back to an empty set; keys
    /// are re-entered by the user in that case.
    pub fn load(storage: &dyn SessionStorage) -> Self {
        storage
            .get(API_KEYS_STORAGE_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Write the credential set back to session storage as JSON
    pub fn save(&self, storage: &mut dyn SessionStorage) -> Result<()> {
        let json = serde_json::to_string(self)?;
        storage.set(API_KEYS_STORAGE_KEY, json);
        Ok(())
    }
}

/// Lifecycle of one key test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyTestState {
    Idle,
    Testing,
    Success,
    Error,
}

/// Outcome of testing one provider's credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTestStatus {
    pub state: KeyTestState,
    pub message: String,
}

impl KeyTestStatus {
    pub fn idle() -> Self {
        Self {
            state: KeyTestState::Idle,
            message: String::new(),
        }
    }

    pub fn testing() -> Self {
        Self {
            state: KeyTestState::Testing,
            message: "Testing key...".to_string(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            state: KeyTestState::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: KeyTestState::Error,
            message: message.into(),
        }
    }
}

impl Default for KeyTestStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// Per-provider key test status, one slot per provider, all starting idle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTestStatuses {
    google_gemini: KeyTestStatus,
    openai: KeyTestStatus,
    open_router: KeyTestStatus,
}

impl KeyTestStatuses {
    pub fn get(&self, provider: Provider) -> &KeyTestStatus {
        match provider {
            Provider::GoogleGemini => &self.google_gemini,
            Provider::OpenAI => &self.openai,
            Provider::OpenRouter => &self.open_router,
        }
    }

    pub fn set(&mut self, provider: Provider, status: KeyTestStatus) {
        match provider {
            Provider::GoogleGemini => self.google_gemini = status,
            Provider::OpenAI => self.openai = status,
            Provider::OpenRouter => self.open_router = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_set_and_get() {
        let mut keys = ApiKeys::default();
        assert!(keys.get(Provider::OpenAI).is_none());

        keys.set(Provider::OpenAI, "sk-test");
        assert_eq!(keys.get(Provider::OpenAI), Some("sk-test"));
        assert!(keys.get(Provider::GoogleGemini).is_none());
    }

    #[test]
    fn test_empty_key_clears_entry() {
        let mut keys = ApiKeys::default();
        keys.set(Provider::OpenRouter, "sk-or");
        keys.set(Provider::OpenRouter, "   ");
        assert!(keys.get(Provider::OpenRouter).is_none());
    }

    #[test]
    fn test_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut keys = ApiKeys::default();
        keys.set(Provider::GoogleGemini, "AIza-test");
        keys.set(Provider::OpenRouter, "sk-or-test");
        keys.save(&mut storage).unwrap();

        let loaded = ApiKeys::load(&storage);
        assert_eq!(loaded, keys);
    }

    #[test]
    fn test_stored_json_uses_display_names() {
        let mut storage = MemoryStorage::new();
        let mut keys = ApiKeys::default();
        keys.set(Provider::GoogleGemini, "AIza-test");
        keys.save(&mut storage).unwrap();

        let raw = storage.get(API_KEYS_STORAGE_KEY).unwrap();
        assert!(raw.contains("\"Google Gemini\""));
        assert!(!raw.contains("google_gemini"));
    }

    #[test]
    fn test_load_tolerates_corrupt_json() {
        let mut storage = MemoryStorage::new();
        storage.set(API_KEYS_STORAGE_KEY, "{not json".to_string());
        assert_eq!(ApiKeys::load(&storage), ApiKeys::default());
    }

    #[test]
    fn test_key_test_statuses_are_independent() {
        let mut statuses = KeyTestStatuses::default();
        statuses.set(Provider::OpenAI, KeyTestStatus::success("Key is valid."));

        assert_eq!(statuses.get(Provider::OpenAI).state, KeyTestState::Success);
        assert_eq!(
            statuses.get(Provider::GoogleGemini).state,
            KeyTestState::Idle
        );
        assert_eq!(statuses.get(Provider::OpenRouter).state, KeyTestState::Idle);
    }
}
