use moka::sync::Cache;
use snafu::ResultExt;
use std::collections::HashMap;
use std::time::Duration;

use crate::{Result, error::SessionDataSnafu, models::LoginFormPayload};
use signin::session::{AUTHENTICATED_KEY, AUTHENTICATED_VALUE, USER_DATA_KEY};

/// Key/value entries of one browser session.
#[derive(Clone, Debug, Default)]
pub struct SessionData {
    entries: HashMap<String, String>,
}

impl SessionData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|val| val.as_str())
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn is_authenticated(&self) -> bool {
        self.get(AUTHENTICATED_KEY) == Some(AUTHENTICATED_VALUE)
    }

    /// JSON copy of the form data submitted on sign-in
    pub fn user_data(&self) -> Option<&str> {
        self.get(USER_DATA_KEY)
    }

    /// Username recorded at sign-in, if the stored form data can be read
    pub fn username(&self) -> Option<String> {
        let data = self.user_data()?;
        let value: serde_json::Value = serde_json::from_str(data).ok()?;
        value
            .get("username")
            .and_then(|val| val.as_str())
            .map(|val| val.to_string())
    }
}

/// Server side storage for session entries, keyed by the session cookie.
///
/// Entries go away after a period of inactivity, the browser drops the
/// cookie itself when the session ends.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionData>,
}

impl SessionStore {
    pub fn new(time_to_idle: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_idle(time_to_idle)
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    pub fn get(&self, session_id: &str) -> SessionData {
        self.cache.get(session_id).unwrap_or_default()
    }

    pub fn set_item(&self, session_id: &str, key: &str, value: String) {
        self.cache
            .entry(session_id.to_string())
            .and_upsert_with(|existing| {
                let mut data = existing.map(|entry| entry.into_value()).unwrap_or_default();
                data.set(key, value);
                data
            });
    }

    /// Records a successful sign-in: the authenticated flag and the submitted form data.
    pub fn mark_authenticated(&self, session_id: &str, payload: &LoginFormPayload) -> Result<()> {
        let user_data =
            serde_json::to_string(&payload.credentials()).context(SessionDataSnafu)?;

        self.set_item(session_id, AUTHENTICATED_KEY, AUTHENTICATED_VALUE.to_string());
        self.set_item(session_id, USER_DATA_KEY, user_data);
        Ok(())
    }

    pub fn clear(&self, session_id: &str) {
        self.cache.invalidate(session_id);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60), 10_000)
    }
}
