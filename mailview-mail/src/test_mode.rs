//! Process-wide test mode.
//!
//! With test mode on, the next mailer created outside a request renders
//! against a placeholder request instead of failing with
//! [`MailError::MissingContext`](crate::MailError::MissingContext).
//! Creating a mailer clears the flag, so it has to be set again before each
//! mailer that needs the placeholder.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

static TEST_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable test mode for the next mailer created.
pub fn set_test_mode(enabled: bool) {
    TEST_MODE.store(enabled, Ordering::SeqCst);
    debug!(enabled, "Mailer test mode changed");
}

/// Check if test mode is enabled.
pub fn is_test_mode_enabled() -> bool {
    TEST_MODE.load(Ordering::SeqCst)
}

/// Read and clear the flag in one step.
pub(crate) fn take_test_mode() -> bool {
    TEST_MODE.swap(false, Ordering::SeqCst)
}
