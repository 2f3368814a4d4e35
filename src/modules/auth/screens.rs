use log::debug;

use super::validation::Field;

/// Which form is currently displayed. Exactly one is active at a time, and
/// the value is independent of whether a session exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    ForgotPassword,
}

/// Finite-state control over the active screen. Transitions happen only
/// through the explicit `show_*` calls; entering the forgot-password screen
/// also queues a one-shot focus request for its email field.
pub struct ScreenNavigator {
    screen: Screen,
    pending_focus: Option<Field>,
}

impl ScreenNavigator {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            pending_focus: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn show_login(&mut self) {
        self.transition(Screen::Login);
    }

    pub fn show_register(&mut self) {
        self.transition(Screen::Register);
    }

    pub fn show_forgot_password(&mut self) {
        self.transition(Screen::ForgotPassword);
        self.pending_focus = Some(Field::ResetEmail);
    }

    /// The field the presentation should move input focus to, if any.
    /// Reading the request consumes it.
    pub fn take_focus_request(&mut self) -> Option<Field> {
        self.pending_focus.take()
    }

    fn transition(&mut self, to: Screen) {
        if self.screen != to {
            debug!("Screen change: {:?} -> {:?}", self.screen, to);
        }
        self.screen = to;
    }
}
