use std::collections::HashMap;
use std::fmt;

use super::screens::Screen;
use crate::MIN_PASSWORD_LEN;

/// The five input fields across the three screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
    Username,
    ResetEmail,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm password",
            Field::Username => "full name",
            Field::ResetEmail => "email",
        };
        write!(f, "{}", name)
    }
}

/// Field-to-message map of validation failures. Rebuilt from scratch on
/// every validation pass, never merged into.
pub type ErrorMap = HashMap<Field, String>;

/// Transient buffer holding what the user has typed. In-memory only;
/// nothing here is ever persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub username: String,
    pub reset_email: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::Email => self.email = value.to_string(),
            Field::Password => self.password = value.to_string(),
            Field::ConfirmPassword => self.confirm_password = value.to_string(),
            Field::Username => self.username = value.to_string(),
            Field::ResetEmail => self.reset_email = value.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Username => &self.username,
            Field::ResetEmail => &self.reset_email,
        }
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Run every rule that applies to `screen` and report all failures at once.
/// The form is submittable iff the returned map is empty.
pub fn validate(screen: Screen, form: &FormState) -> ErrorMap {
    let mut errors = ErrorMap::new();

    match screen {
        Screen::Login | Screen::Register => {
            check_email(Field::Email, &form.email, &mut errors);
            check_password(&form.password, &mut errors);

            if screen == Screen::Register {
                if form.password != form.confirm_password {
                    errors.insert(Field::ConfirmPassword, "Passwords do not match".to_string());
                }
                if form.username.is_empty() {
                    errors.insert(Field::Username, "Full name is required".to_string());
                }
            }
        }
        Screen::ForgotPassword => {
            check_email(Field::ResetEmail, &form.reset_email, &mut errors);
        }
    }

    errors
}

fn check_email(field: Field, value: &str, errors: &mut ErrorMap) {
    if value.is_empty() {
        errors.insert(field, "Email is required".to_string());
    } else if !is_email_shaped(value) {
        errors.insert(field, "Invalid email format".to_string());
    }
}

fn check_password(value: &str, errors: &mut ErrorMap) {
    if value.is_empty() {
        errors.insert(Field::Password, "Password is required".to_string());
    } else if value.len() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            "Password must be at least 6 characters".to_string(),
        );
    }
}

/// Function to check the `local@domain.tld` shape: no whitespace anywhere,
/// at least one character before the '@', and a '.' inside the part after
/// it with at least one character on each side.
pub fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.find('@') {
        Some(at) if at > 0 => {
            let domain = &email[at + 1..];
            domain
                .char_indices()
                .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
        }
        _ => false,
    }
}
