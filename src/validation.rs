//! Input-format checks for account credentials.

use crate::error::ValidationError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 15;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Check a username against the length, space and character rules.
///
/// Rules are applied in that order and the first failure is returned.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }
    if username.contains(' ') {
        return Err(ValidationError::UsernameSpace);
    }
    // Equivalent to ^[A-Za-z0-9]+$ once the length check has passed.
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::UsernameCharacter);
    }
    Ok(())
}

/// Check a password for minimum length, an uppercase letter and a digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordLength);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::PasswordUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordDigit);
    }
    Ok(())
}
