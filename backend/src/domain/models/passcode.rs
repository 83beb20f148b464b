use chrono::{DateTime, Utc};
use thiserror::Error;

/// Consecutive failed attempts before the account locks.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Lockout window in seconds (30 minutes). Also the fixed remaining-time
/// estimate reported while a lock is open.
pub const LOCKOUT_WINDOW_SECS: i64 = 1800;

/// Required passcode length in ASCII digits.
pub const PASSCODE_LENGTH: usize = 6;

/// Stored passcode credential for one user.
///
/// The Argon2id PHC string embeds the salt, so there is no separate salt
/// column.
#[derive(Debug, Clone)]
pub struct PasscodeRecord {
    pub user_id: String,
    pub passcode_hash: String,
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: String,
    pub updated_at: String,
}

impl PasscodeRecord {
    /// Whether the lockout window is still open at `now`. An expired lock
    /// behaves as if no lock exists.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map(|until| until > now).unwrap_or(false)
    }

    pub fn attempts_remaining(&self) -> u32 {
        MAX_FAILED_ATTEMPTS.saturating_sub(self.failed_attempts)
    }
}

/// Returns true when `code` is exactly six ASCII digits.
pub fn is_valid_format(code: &str) -> bool {
    code.len() == PASSCODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

/// User-facing error messages for passcode operations. Storage failures
/// never reach callers as transport errors; services log them and return
/// generic failure results instead.
#[derive(Debug, Error)]
pub enum PasscodeError {
    #[error("Passcode must be exactly 6 digits")]
    InvalidFormat,
    #[error("A passcode is already set for this user")]
    AlreadyExists,
    #[error("Incorrect passcode")]
    IncorrectPasscode,
    #[error("Passcode entry is locked")]
    Locked,
}
