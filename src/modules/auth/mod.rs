pub mod flow;
pub mod reset;
pub mod screens;
pub mod session;
pub mod store;
pub mod validation;

// Re-export the main types and functions
pub use flow::AuthFlow;
pub use reset::ResetFlow;
pub use screens::{Screen, ScreenNavigator};
pub use session::{LoginCallback, LoginError, SessionController, SessionState};
pub use store::{CredentialStore, UserRecord};
pub use validation::{is_email_shaped, validate, ErrorMap, Field, FormState};
