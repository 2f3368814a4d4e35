mod modules;

pub use modules::auth::flow::AuthFlow;
pub use modules::auth::screens::Screen;
pub use modules::auth::session::{LoginCallback, LoginError, SessionState};
pub use modules::auth::store::UserRecord;
pub use modules::auth::validation::{validate, ErrorMap, Field, FormState};
pub use modules::{auth, cli, storage, utils};

// Storage keys for the two durable slots
pub const USERS_KEY: &str = "users";
pub const SESSION_KEY: &str = "currentUser";

// Validation thresholds
pub const MIN_PASSWORD_LEN: usize = 6;

// How long the "reset link sent" notice stays up before the flow returns
// to the login screen on its own
pub const RESET_RETURN_DELAY_MS: u64 = 3000;
