use crate::modules::utils::logging::log_auth_event;
use crate::RESET_RETURN_DELAY_MS;

/// The simulated password-reset request. No message leaves the process and
/// nothing in the store changes; a successful request raises the "sent"
/// notice and arms a one-shot deadline, after which the flow returns to the
/// login screen on its own.
pub struct ResetFlow {
    pub(crate) sent: bool,
    pub(crate) return_at: Option<u64>,
}

impl ResetFlow {
    pub fn new() -> Self {
        Self {
            sent: false,
            return_at: None,
        }
    }

    /// Whether the "reset link sent" notice is currently up.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Mark the request as sent and schedule the automatic return. The
    /// caller validates the email before getting here.
    pub fn request(&mut self, email: &str, now_ms: u64) {
        self.sent = true;
        self.return_at = Some(now_ms + RESET_RETURN_DELAY_MS);
        log_auth_event("reset_request", email, true, Some("simulated send"));
    }

    /// Check the deadline against `now_ms`. Returns true exactly once, at
    /// the first check after the delay has elapsed; the notice drops at the
    /// same moment. Further checks are no-ops until the next request.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.return_at {
            Some(deadline) if now_ms >= deadline => {
                self.sent = false;
                self.return_at = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending deadline and the notice, for when the user
    /// navigates away by hand before the delay elapses.
    pub fn cancel(&mut self) {
        self.sent = false;
        self.return_at = None;
    }
}
