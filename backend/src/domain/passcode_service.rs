use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use chrono::{Duration, Utc};
use log::{error, info, warn};
use rand::rngs::OsRng;

use crate::domain::commands::passcode::{
    ChangePasscodeCommand, PasscodeActionResult, PasscodeStatusResult, SetupPasscodeCommand,
    VerifyPasscodeCommand, VerifyPasscodeResult,
};
use crate::domain::models::passcode::{
    is_valid_format, PasscodeError, LOCKOUT_WINDOW_SECS, MAX_FAILED_ATTEMPTS,
};
use crate::storage::{DbConnection, PasscodeRepository};

/// Argon2id parameters for passcode hashing (memory KiB, iterations, lanes).
/// Lighter than a full password KDF; the attempt counter and lockout window
/// carry the brute-force resistance.
const ARGON2_PARAMS: (u32, u32, u32) = (16384, 2, 2);

/// Service for the 6-digit passcode lifecycle.
///
/// State machine per user: NO_PASSCODE -> ACTIVE -> LOCKED -> ACTIVE, where
/// a lock opens after five consecutive failures and expires after 30
/// minutes. Storage failures are logged here and downgraded to generic
/// failure results; callers never see transport errors.
#[derive(Clone)]
pub struct PasscodeService {
    repo: PasscodeRepository,
}

impl PasscodeService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repo: PasscodeRepository::new(db),
        }
    }

    /// Whether a passcode exists for the user. "Not found" is `false`, not
    /// an error.
    pub async fn has_passcode(&self, user_id: &str) -> bool {
        match self.repo.get_passcode(user_id).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                error!("Failed to check passcode existence for {}: {}", user_id, e);
                false
            }
        }
    }

    /// Create a passcode for a user that has none.
    pub async fn setup_passcode(&self, command: SetupPasscodeCommand) -> PasscodeActionResult {
        info!("Setting up passcode for user {}", command.user_id);

        if !is_valid_format(&command.passcode) {
            return PasscodeActionResult::failure(PasscodeError::InvalidFormat.to_string());
        }

        match self.repo.get_passcode(&command.user_id).await {
            Ok(Some(_)) => {
                return PasscodeActionResult::failure(PasscodeError::AlreadyExists.to_string());
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to read passcode record for {}: {}", command.user_id, e);
                return PasscodeActionResult::failure("Failed to set up passcode");
            }
        }

        let hash = match hash_passcode(&command.passcode) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash passcode for {}: {}", command.user_id, e);
                return PasscodeActionResult::failure("Failed to set up passcode");
            }
        };

        match self.repo.setup_user_passcode(&command.user_id, &hash).await {
            Ok(()) => {
                info!("Passcode created for user {}", command.user_id);
                PasscodeActionResult::ok()
            }
            Err(e) => {
                error!("Failed to store passcode for {}: {}", command.user_id, e);
                PasscodeActionResult::failure("Failed to set up passcode")
            }
        }
    }

    /// Verify a passcode attempt.
    ///
    /// The lock state is checked before the hash: a locked user gets the
    /// fixed 1800-second remaining estimate without any verification work.
    /// Success resets the failure counter; failure increments it and opens
    /// the lockout window at the fifth consecutive miss.
    pub async fn verify_passcode(&self, command: VerifyPasscodeCommand) -> VerifyPasscodeResult {
        if !is_valid_format(&command.passcode) {
            return VerifyPasscodeResult::failure(PasscodeError::InvalidFormat.to_string());
        }

        let record = match self.repo.get_passcode(&command.user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return VerifyPasscodeResult::failure("No passcode is set for this user");
            }
            Err(e) => {
                error!("Failed to read passcode record for {}: {}", command.user_id, e);
                return VerifyPasscodeResult::failure("Failed to verify passcode");
            }
        };

        let now = Utc::now();
        if record.is_locked_at(now) {
            warn!("Passcode entry for {} is locked", command.user_id);
            return VerifyPasscodeResult::locked();
        }

        let matches = match verify_passcode_hash(&command.passcode, &record.passcode_hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!("Failed to verify passcode hash for {}: {}", command.user_id, e);
                return VerifyPasscodeResult::failure("Failed to verify passcode");
            }
        };

        if matches {
            if let Err(e) = self.repo.reset_passcode_attempts(&command.user_id).await {
                warn!("Failed to reset attempt counter for {}: {}", command.user_id, e);
            }
            info!("Passcode verified for user {}", command.user_id);
            return VerifyPasscodeResult::ok();
        }

        let attempts = match self.repo.increment_passcode_attempts(&command.user_id).await {
            Ok(attempts) => attempts,
            Err(e) => {
                error!("Failed to count failed attempt for {}: {}", command.user_id, e);
                return VerifyPasscodeResult::failure("Failed to verify passcode");
            }
        };

        if attempts >= MAX_FAILED_ATTEMPTS {
            let until = now + Duration::seconds(LOCKOUT_WINDOW_SECS);
            if let Err(e) = self.repo.set_locked_until(&command.user_id, until).await {
                error!("Failed to open lockout window for {}: {}", command.user_id, e);
            }
            warn!(
                "User {} locked out after {} failed passcode attempts",
                command.user_id, attempts
            );
        } else {
            info!(
                "Failed passcode attempt {} of {} for user {}",
                attempts, MAX_FAILED_ATTEMPTS, command.user_id
            );
        }

        VerifyPasscodeResult::wrong_code(MAX_FAILED_ATTEMPTS.saturating_sub(attempts))
    }

    /// Swap the passcode after verifying the current one. A wrong current
    /// code never mutates the stored passcode.
    pub async fn change_passcode(&self, command: ChangePasscodeCommand) -> VerifyPasscodeResult {
        let verify = self
            .verify_passcode(VerifyPasscodeCommand {
                user_id: command.user_id.clone(),
                passcode: command.current_passcode.clone(),
            })
            .await;
        if !verify.success {
            return verify;
        }

        if !is_valid_format(&command.new_passcode) {
            return VerifyPasscodeResult::failure(PasscodeError::InvalidFormat.to_string());
        }

        let hash = match hash_passcode(&command.new_passcode) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash new passcode for {}: {}", command.user_id, e);
                return VerifyPasscodeResult::failure("Failed to change passcode");
            }
        };

        match self
            .repo
            .change_user_passcode(&command.user_id, &hash)
            .await
        {
            Ok(()) => {
                info!("Passcode changed for user {}", command.user_id);
                VerifyPasscodeResult::ok()
            }
            Err(e) => {
                error!("Failed to store new passcode for {}: {}", command.user_id, e);
                VerifyPasscodeResult::failure("Failed to change passcode")
            }
        }
    }

    /// Delete the passcode record. No re-authentication happens here; the
    /// caller is trusted the way the original client trusted its session.
    pub async fn reset_passcode(&self, user_id: &str) -> PasscodeActionResult {
        warn!("Resetting passcode for user {} without re-authentication", user_id);

        match self.repo.delete_passcode(user_id).await {
            Ok(_) => PasscodeActionResult::ok(),
            Err(e) => {
                error!("Failed to delete passcode for {}: {}", user_id, e);
                PasscodeActionResult::failure("Failed to reset passcode")
            }
        }
    }

    /// Read-only aggregate of the passcode state.
    pub async fn get_passcode_status(&self, user_id: &str) -> PasscodeStatusResult {
        match self.repo.get_passcode(user_id).await {
            Ok(Some(record)) => PasscodeStatusResult {
                has_passcode: true,
                is_locked: record.is_locked_at(Utc::now()),
                failed_attempts: record.failed_attempts,
                attempts_remaining: record.attempts_remaining(),
            },
            Ok(None) => PasscodeStatusResult::no_passcode(),
            Err(e) => {
                error!("Failed to read passcode status for {}: {}", user_id, e);
                PasscodeStatusResult::no_passcode()
            }
        }
    }
}

/// Hash a passcode into an Argon2id PHC string (salt embedded).
fn hash_passcode(code: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(ARGON2_PARAMS.0)
        .t_cost(ARGON2_PARAMS.1)
        .p_cost(ARGON2_PARAMS.2)
        .build()
        .map_err(|e| anyhow::anyhow!("invalid Argon2 parameters: {}", e))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(code.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("passcode hashing failed: {}", e))?
        .to_string();

    Ok(hash)
}

/// Check a passcode against a stored PHC string. The parameters and salt
/// come from the string itself.
fn verify_passcode_hash(code: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| anyhow::anyhow!("stored passcode hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(code.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> PasscodeService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        PasscodeService::new(db)
    }

    fn setup_command(user_id: &str, passcode: &str) -> SetupPasscodeCommand {
        SetupPasscodeCommand {
            user_id: user_id.to_string(),
            passcode: passcode.to_string(),
        }
    }

    fn verify_command(user_id: &str, passcode: &str) -> VerifyPasscodeCommand {
        VerifyPasscodeCommand {
            user_id: user_id.to_string(),
            passcode: passcode.to_string(),
        }
    }

    #[tokio::test]
    async fn test_setup_rejects_malformed_codes() {
        let service = setup_test().await;

        for code in ["12345", "1234567", "12345a", "abcdef", "", "12 456"] {
            let result = service.setup_passcode(setup_command("user-1", code)).await;
            assert!(!result.success, "code '{}' should be rejected", code);
            assert_eq!(
                result.error.as_deref(),
                Some("Passcode must be exactly 6 digits")
            );
        }

        // Nothing was stored along the way
        assert!(!service.has_passcode("user-1").await);
    }

    #[tokio::test]
    async fn test_setup_and_verify() {
        let service = setup_test().await;

        assert!(!service.has_passcode("user-1").await);

        let result = service.setup_passcode(setup_command("user-1", "123456")).await;
        assert!(result.success);
        assert!(service.has_passcode("user-1").await);

        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(result.success);

        let result = service.verify_passcode(verify_command("user-1", "654321")).await;
        assert!(!result.success);
        assert_eq!(result.attempts_remaining, Some(4));
    }

    #[tokio::test]
    async fn test_setup_twice_fails() {
        let service = setup_test().await;

        service.setup_passcode(setup_command("user-1", "123456")).await;
        let result = service.setup_passcode(setup_command("user-1", "999999")).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("A passcode is already set for this user")
        );

        // The original passcode still verifies
        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_lockout_after_five_failures() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        for expected_remaining in [4u32, 3, 2, 1] {
            let result = service.verify_passcode(verify_command("user-1", "000000")).await;
            assert!(!result.success);
            assert_eq!(result.attempts_remaining, Some(expected_remaining));
            assert_eq!(result.is_locked, None);
        }

        // Fifth failure exhausts the attempts but reports the count, not the lock
        let result = service.verify_passcode(verify_command("user-1", "000000")).await;
        assert!(!result.success);
        assert_eq!(result.attempts_remaining, Some(0));
        assert_eq!(result.is_locked, None);

        let status = service.get_passcode_status("user-1").await;
        assert!(status.is_locked);
        assert_eq!(status.failed_attempts, 5);
        assert_eq!(status.attempts_remaining, 0);

        // Subsequent attempts short-circuit on the lock, even with the right code
        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(!result.success);
        assert_eq!(result.is_locked, Some(true));
        assert_eq!(result.lockout_time_remaining, Some(1800));
    }

    #[tokio::test]
    async fn test_successful_verify_resets_counter() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        service.verify_passcode(verify_command("user-1", "000000")).await;
        service.verify_passcode(verify_command("user-1", "111111")).await;

        let status = service.get_passcode_status("user-1").await;
        assert_eq!(status.failed_attempts, 2);

        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(result.success);

        let status = service.get_passcode_status("user-1").await;
        assert_eq!(status.failed_attempts, 0);
        assert_eq!(status.attempts_remaining, 5);
    }

    #[tokio::test]
    async fn test_change_requires_correct_current() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        let result = service
            .change_passcode(ChangePasscodeCommand {
                user_id: "user-1".to_string(),
                current_passcode: "000000".to_string(),
                new_passcode: "222222".to_string(),
            })
            .await;
        assert!(!result.success);
        assert_eq!(result.attempts_remaining, Some(4));

        // The stored passcode is unchanged
        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(result.success);
        let result = service.verify_passcode(verify_command("user-1", "222222")).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_change_swaps_passcode() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        let result = service
            .change_passcode(ChangePasscodeCommand {
                user_id: "user-1".to_string(),
                current_passcode: "123456".to_string(),
                new_passcode: "222222".to_string(),
            })
            .await;
        assert!(result.success);

        assert!(service.verify_passcode(verify_command("user-1", "222222")).await.success);
        assert!(!service.verify_passcode(verify_command("user-1", "123456")).await.success);
    }

    #[tokio::test]
    async fn test_change_rejects_malformed_new_code() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        let result = service
            .change_passcode(ChangePasscodeCommand {
                user_id: "user-1".to_string(),
                current_passcode: "123456".to_string(),
                new_passcode: "22".to_string(),
            })
            .await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Passcode must be exactly 6 digits")
        );

        // Old code still works
        assert!(service.verify_passcode(verify_command("user-1", "123456")).await.success);
    }

    #[tokio::test]
    async fn test_reset_deletes_record() {
        let service = setup_test().await;
        service.setup_passcode(setup_command("user-1", "123456")).await;

        let result = service.reset_passcode("user-1").await;
        assert!(result.success);
        assert!(!service.has_passcode("user-1").await);

        // Resetting an absent record is still a success
        let result = service.reset_passcode("user-1").await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_status_without_passcode() {
        let service = setup_test().await;

        let status = service.get_passcode_status("user-1").await;
        assert!(!status.has_passcode);
        assert!(!status.is_locked);
        assert_eq!(status.failed_attempts, 0);
        assert_eq!(status.attempts_remaining, 5);
    }

    #[tokio::test]
    async fn test_verify_without_passcode_fails_cleanly() {
        let service = setup_test().await;

        let result = service.verify_passcode(verify_command("user-1", "123456")).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("No passcode is set for this user")
        );
    }

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_passcode("123456").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_passcode_hash("123456", &hash).unwrap());
        assert!(!verify_passcode_hash("654321", &hash).unwrap());
    }
}
