use std::io;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::modules::storage::Storage;
use crate::modules::utils::logging::log_store_event;
use crate::modules::utils::time::now_millis;
use crate::{SESSION_KEY, USERS_KEY};

/// A registered account, stored verbatim. The password is kept in plain
/// text: this crate reproduces a local mock of an auth flow, not a secure
/// credential system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub username: String,
    pub profile_image: Option<String>,
}

/// The registered-user collection plus the single current-session slot,
/// both kept in the durable key/value store.
///
/// The collection is read back from storage on every operation and written
/// whole on every registration. Anything unreadable, whether an absent key,
/// foreign content or a partial write, collapses to the empty default so
/// that first run and corruption are indistinguishable from "no data yet".
pub struct CredentialStore {
    storage: Box<dyn Storage>,
    last_id: u64,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            last_id: 0,
        }
    }

    /// Load the full registered-user collection, in registration order.
    pub fn load_users(&self) -> Vec<UserRecord> {
        match self.storage.get(USERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    log_store_event("load", USERS_KEY, false, Some(&e.to_string()));
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log_store_event("load", USERS_KEY, false, Some(&e.to_string()));
                Vec::new()
            }
        }
    }

    /// First record whose email matches exactly (case-sensitive). With
    /// duplicate emails in the collection this resolves to the earliest
    /// registration.
    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.load_users().into_iter().find(|u| u.email == email)
    }

    /// Create an account: assign a fresh id, append the record to the
    /// collection, persist the collection, then persist the record as the
    /// current session.
    pub fn register(
        &mut self,
        email: String,
        password: String,
        username: String,
    ) -> io::Result<UserRecord> {
        let record = UserRecord {
            id: self.next_id(),
            email,
            password,
            username,
            profile_image: None,
        };

        // TODO: an account with this email may already exist; decide whether
        // duplicates should be rejected here (lookups take the first match
        // today, so later registrations under the same email are dead weight)
        let mut users = self.load_users();
        users.push(record.clone());
        self.save_users(&users)?;

        // The registration is durable at this point; a failed session write
        // only costs the next startup its rehydration
        if let Err(e) = self.persist_session(&record) {
            warn!("Failed to persist session for new account: {}", e);
        }

        Ok(record)
    }

    /// Write the whole collection under its well-known key.
    pub fn save_users(&mut self, users: &[UserRecord]) -> io::Result<()> {
        let data = serde_json::to_string_pretty(users)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        match self.storage.set(USERS_KEY, &data) {
            Ok(()) => {
                log_store_event("save", USERS_KEY, true, None);
                Ok(())
            }
            Err(e) => {
                log_store_event("save", USERS_KEY, false, Some(&e.to_string()));
                Err(e)
            }
        }
    }

    /// Record `user` as the currently signed-in account.
    pub fn persist_session(&mut self, user: &UserRecord) -> io::Result<()> {
        let data = serde_json::to_string_pretty(user)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        match self.storage.set(SESSION_KEY, &data) {
            Ok(()) => {
                log_store_event("save", SESSION_KEY, true, None);
                Ok(())
            }
            Err(e) => {
                log_store_event("save", SESSION_KEY, false, Some(&e.to_string()));
                Err(e)
            }
        }
    }

    /// The persisted session, if one exists and still parses as a record.
    pub fn load_session(&self) -> Option<UserRecord> {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log_store_event("load", SESSION_KEY, false, Some(&e.to_string()));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log_store_event("load", SESSION_KEY, false, Some(&e.to_string()));
                None
            }
        }
    }

    /// Drop the persisted session slot.
    pub fn clear_session(&mut self) -> io::Result<()> {
        self.storage.remove(SESSION_KEY)?;
        log_store_event("remove", SESSION_KEY, true, None);
        Ok(())
    }

    /// Time-based ordinal, strictly increasing across calls in one process
    /// even when two registrations land in the same millisecond.
    fn next_id(&mut self) -> u64 {
        let id = now_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryStorage;

    fn memory_store() -> CredentialStore {
        CredentialStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_first_run_is_empty() {
        let store = memory_store();
        assert!(store.load_users().is_empty());
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_register_builds_and_persists_the_record() {
        let mut store = memory_store();
        let record = store
            .register("a@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();

        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.username, "Ann");
        assert_eq!(record.profile_image, None);

        let users = store.load_users();
        assert_eq!(users, vec![record.clone()]);

        // Registration also signs the new account in
        assert_eq!(store.load_session(), Some(record));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut store = memory_store();
        let first = store
            .register("a@x.com".into(), "secret1".into(), "A".into())
            .unwrap();
        let second = store
            .register("b@x.com".into(), "secret1".into(), "B".into())
            .unwrap();
        let third = store
            .register("c@x.com".into(), "secret1".into(), "C".into())
            .unwrap();

        assert!(second.id > first.id);
        assert!(third.id > second.id);
    }

    #[test]
    fn test_duplicate_emails_resolve_to_the_first_match() {
        let mut store = memory_store();
        let first = store
            .register("a@b.com".into(), "one111".into(), "First".into())
            .unwrap();
        store
            .register("a@b.com".into(), "two222".into(), "Second".into())
            .unwrap();

        assert_eq!(store.load_users().len(), 2);

        let found = store.find_by_email("a@b.com").unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.username, "First");
    }

    #[test]
    fn test_email_matching_is_exact() {
        let mut store = memory_store();
        store
            .register("Ann@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();

        assert!(store.find_by_email("ann@b.com").is_none());
        assert!(store.find_by_email("Ann@b.com").is_some());
        assert!(store.find_by_email("Ann@b.com ").is_none());
    }

    #[test]
    fn test_corrupt_blobs_read_as_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set(USERS_KEY, "definitely not json").unwrap();
        storage.set(SESSION_KEY, "{\"wrong\": \"shape\"}").unwrap();

        let store = CredentialStore::new(Box::new(storage));
        assert!(store.load_users().is_empty());
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_collection_round_trip_preserves_fields_and_order() {
        let mut store = memory_store();
        for n in 0..5 {
            store
                .register(
                    format!("user{}@example.com", n),
                    format!("pass{}word", n),
                    format!("User {}", n),
                )
                .unwrap();
        }

        let users = store.load_users();
        assert_eq!(users.len(), 5);
        for (n, user) in users.iter().enumerate() {
            assert_eq!(user.email, format!("user{}@example.com", n));
            assert_eq!(user.password, format!("pass{}word", n));
            assert_eq!(user.username, format!("User {}", n));
            assert_eq!(user.profile_image, None);
        }
    }

    #[test]
    fn test_session_slot_lifecycle() {
        let mut store = memory_store();
        let record = store
            .register("a@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();

        assert_eq!(store.load_session(), Some(record.clone()));

        store.clear_session().unwrap();
        assert!(store.load_session().is_none());

        // The collection is untouched by session changes
        assert_eq!(store.load_users(), vec![record]);
    }

    #[test]
    fn test_record_json_uses_the_persisted_field_names() {
        let record = UserRecord {
            id: 7,
            email: "a@b.com".into(),
            password: "secret1".into(),
            username: "Ann".into(),
            profile_image: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"profileImage\":null"));
        assert!(json.contains("\"username\":\"Ann\""));

        let parsed: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_record_json_accepts_a_missing_profile_image() {
        let json = "{\"id\":1,\"email\":\"a@b.com\",\"password\":\"secret1\",\"username\":\"Ann\"}";
        let parsed: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.profile_image, None);
    }
}
