use log::{debug, error};

use super::reset::ResetFlow;
use super::screens::{Screen, ScreenNavigator};
use super::session::{LoginCallback, SessionController, SessionState};
use super::store::{CredentialStore, UserRecord};
use super::validation::{validate, ErrorMap, Field, FormState};
use crate::modules::storage::Storage;
use crate::modules::utils::time::now_millis;

/// The authentication front end: owns the form buffer, the error map, the
/// screen navigator, the reset flow and the session controller, and exposes
/// the event surface a presentation layer drives.
///
/// Everything is synchronous and single-threaded; each event runs to
/// completion before the next one is looked at. The one deferred behavior,
/// the reset flow's automatic return to login, is a stored deadline checked
/// by [`AuthFlow::tick`], so a host that stops ticking or navigates away
/// never sees a stale transition.
pub struct AuthFlow {
    session: SessionController,
    navigator: ScreenNavigator,
    reset: ResetFlow,
    form: FormState,
    errors: ErrorMap,
}

impl AuthFlow {
    /// Mount the component over a storage backend. A session persisted by
    /// an earlier run is restored immediately, without invoking `on_login`.
    pub fn new(storage: Box<dyn Storage>, on_login: LoginCallback) -> Self {
        let store = CredentialStore::new(storage);
        Self {
            session: SessionController::new(store, on_login),
            navigator: ScreenNavigator::new(),
            reset: ResetFlow::new(),
            form: FormState::new(),
            errors: ErrorMap::new(),
        }
    }

    // State the presentation reads

    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.session.current_user()
    }

    pub fn reset_sent(&self) -> bool {
        self.reset.is_sent()
    }

    pub fn take_focus_request(&mut self) -> Option<Field> {
        self.navigator.take_focus_request()
    }

    // Events the presentation sends

    /// A field changed: store the value and clear that field's error, and
    /// only that field's, so stale messages disappear as the user types.
    pub fn set_field(&mut self, field: Field, value: &str) {
        self.form.set(field, value);
        self.errors.remove(&field);
    }

    /// Submit the active screen's form. Validation runs first and replaces
    /// the whole error map; only a clean pass reaches the store.
    pub fn submit(&mut self) {
        if self.session.is_authenticated() {
            debug!("Submit ignored: already authenticated");
            return;
        }

        match self.navigator.screen() {
            Screen::Login => self.submit_login(),
            Screen::Register => self.submit_register(),
            Screen::ForgotPassword => self.submit_reset_request(),
        }
    }

    pub fn show_login(&mut self) {
        self.reset.cancel();
        self.navigator.show_login();
    }

    pub fn show_register(&mut self) {
        self.reset.cancel();
        self.navigator.show_register();
    }

    pub fn show_forgot_password(&mut self) {
        self.reset.cancel();
        self.navigator.show_forgot_password();
    }

    /// Sign out and return to a fresh login screen: the persisted session
    /// is dropped, every form field and error is cleared, and any pending
    /// reset deadline dies with them.
    pub fn logout(&mut self) {
        self.session.logout();
        self.form.clear();
        self.errors.clear();
        self.reset.cancel();
        self.navigator.show_login();
    }

    /// Drive deferred work. The host calls this from its event loop; when
    /// the reset delay elapses the navigator is forced back to login,
    /// exactly once per request.
    pub fn tick(&mut self) {
        if self.reset.poll(now_millis()) {
            self.navigator.show_login();
        }
    }

    // Per-screen submit paths

    fn submit_login(&mut self) {
        self.errors = validate(Screen::Login, &self.form);
        if !self.errors.is_empty() {
            return;
        }

        if let Err(e) = self.session.login(&self.form.email, &self.form.password) {
            // The failure replaces the map wholesale: exactly one entry,
            // under the field the user has to correct
            self.errors = ErrorMap::from([(e.field(), e.to_string())]);
        }
    }

    fn submit_register(&mut self) {
        self.errors = validate(Screen::Register, &self.form);
        if !self.errors.is_empty() {
            return;
        }

        if let Err(e) = self.session.register(
            self.form.email.clone(),
            self.form.password.clone(),
            self.form.username.clone(),
        ) {
            // Nothing durable was written; stay on the screen so the user
            // can try again
            error!("Registration could not be persisted: {}", e);
        }
    }

    fn submit_reset_request(&mut self) {
        self.errors = validate(Screen::ForgotPassword, &self.form);
        if !self.errors.is_empty() {
            return;
        }

        self.reset.request(&self.form.reset_email, now_millis());
    }
}
