use std::fmt;
use std::io;

use log::warn;

use super::store::{CredentialStore, UserRecord};
use super::validation::Field;
use crate::modules::utils::logging::log_auth_event;

/// Callback the host supplies to hear about successful logins and
/// registrations. Never invoked for a session restored at startup.
pub type LoginCallback = Box<dyn FnMut(&UserRecord)>;

/// Whether someone is signed in, and who.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(UserRecord),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }
}

/// Why a login attempt was refused. The display strings are the exact
/// messages surfaced under the corresponding form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// No account is registered under the submitted email
    UserNotFound,
    /// The account exists but the password does not match
    BadCredentials,
}

impl LoginError {
    /// The form field this failure is surfaced under.
    pub fn field(&self) -> Field {
        match self {
            LoginError::UserNotFound => Field::Email,
            LoginError::BadCredentials => Field::Password,
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::UserNotFound => write!(f, "No user found with this email"),
            LoginError::BadCredentials => write!(f, "Incorrect password"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Owns the authenticated/anonymous state and runs login, register and
/// logout on top of the credential store, reporting successes upward
/// through the host's callback.
pub struct SessionController {
    store: CredentialStore,
    state: SessionState,
    on_login: LoginCallback,
}

impl SessionController {
    /// Build the controller, rehydrating a persisted session if one exists.
    /// Rehydration does not invoke the callback; only fresh logins and
    /// registrations do.
    pub fn new(store: CredentialStore, on_login: LoginCallback) -> Self {
        let state = match store.load_session() {
            Some(user) => {
                log_auth_event("rehydrate", &user.email, true, Some("persisted session restored"));
                SessionState::Authenticated(user)
            }
            None => SessionState::Anonymous,
        };

        Self {
            store,
            state,
            on_login,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.state.user()
    }

    /// Attempt to sign in with the submitted credentials. Lookup is by
    /// exact email; the stored and submitted passwords must match exactly.
    pub fn login(&mut self, email: &str, password: &str) -> Result<UserRecord, LoginError> {
        let user = match self.store.find_by_email(email) {
            Some(user) => user,
            None => {
                log_auth_event("login", email, false, Some("no such account"));
                return Err(LoginError::UserNotFound);
            }
        };

        if user.password != password {
            log_auth_event("login", email, false, Some("wrong password"));
            return Err(LoginError::BadCredentials);
        }

        // The in-memory session stands even if the durable write fails;
        // the account itself already lives in the collection
        if let Err(e) = self.store.persist_session(&user) {
            warn!("Failed to persist session: {}", e);
        }

        self.state = SessionState::Authenticated(user.clone());
        log_auth_event("login", email, true, None);
        (self.on_login)(&user);

        Ok(user)
    }

    /// Create the account and sign it in. The caller is responsible for
    /// validating the fields first.
    pub fn register(
        &mut self,
        email: String,
        password: String,
        username: String,
    ) -> io::Result<UserRecord> {
        let log_email = email.clone();
        let user = match self.store.register(email, password, username) {
            Ok(user) => user,
            Err(e) => {
                // The collection write failed, so there is no durable record
                // for a session to point at; stay anonymous
                log_auth_event("register", &log_email, false, Some(&e.to_string()));
                return Err(e);
            }
        };

        self.state = SessionState::Authenticated(user.clone());
        log_auth_event("register", &user.email, true, None);
        (self.on_login)(&user);

        Ok(user)
    }

    /// Sign out: drop the durable session slot and return to anonymous.
    pub fn logout(&mut self) {
        if let Some(user) = self.state.user() {
            log_auth_event("logout", &user.email, true, None);
        }
        if let Err(e) = self.store.clear_session() {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::{FileStorage, MemoryStorage};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller_with_log() -> (SessionController, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));
        let controller = SessionController::new(
            store,
            Box::new(move |user| sink.borrow_mut().push(user.email.clone())),
        );
        (controller, seen)
    }

    #[test]
    fn test_starts_anonymous_on_first_run() {
        let (controller, seen) = controller_with_log();
        assert!(!controller.is_authenticated());
        assert_eq!(controller.state(), &SessionState::Anonymous);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_login_with_unknown_email() {
        let (mut controller, seen) = controller_with_log();
        let result = controller.login("ghost@example.com", "secret1");

        assert_eq!(result, Err(LoginError::UserNotFound));
        assert!(!controller.is_authenticated());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_login_with_wrong_password() {
        let (mut controller, seen) = controller_with_log();
        controller
            .register("a@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();
        controller.logout();

        let result = controller.login("a@b.com", "not-the-password");
        assert_eq!(result, Err(LoginError::BadCredentials));
        assert!(!controller.is_authenticated());

        // Only the registration reported upward
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_register_then_login_round_trip() {
        let (mut controller, seen) = controller_with_log();
        controller
            .register("a@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();
        assert!(controller.is_authenticated());

        controller.logout();
        assert!(!controller.is_authenticated());

        let user = controller.login("a@b.com", "secret1").unwrap();
        assert_eq!(user.username, "Ann");
        assert_eq!(user.profile_image, None);
        assert!(controller.is_authenticated());

        // One callback per successful action: register, then login
        assert_eq!(
            *seen.borrow(),
            vec!["a@b.com".to_string(), "a@b.com".to_string()]
        );
    }

    #[test]
    fn test_rehydration_restores_without_the_callback() {
        let dir = tempfile::tempdir().unwrap();

        let store = CredentialStore::new(Box::new(FileStorage::new(dir.path())));
        let mut controller = SessionController::new(store, Box::new(|_| {}));
        controller
            .register("a@b.com".into(), "secret1".into(), "Ann".into())
            .unwrap();
        drop(controller);

        // A fresh controller over the same data starts signed in, silently
        let seen = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&seen);
        let store = CredentialStore::new(Box::new(FileStorage::new(dir.path())));
        let controller =
            SessionController::new(store, Box::new(move |_| *sink.borrow_mut() += 1));

        assert!(controller.is_authenticated());
        assert_eq!(controller.current_user().unwrap().username, "Ann");
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_error_messages_are_the_field_messages() {
        assert_eq!(
            LoginError::UserNotFound.to_string(),
            "No user found with this email"
        );
        assert_eq!(LoginError::BadCredentials.to_string(), "Incorrect password");
        assert_eq!(LoginError::UserNotFound.field(), Field::Email);
        assert_eq!(LoginError::BadCredentials.field(), Field::Password);
    }
}
