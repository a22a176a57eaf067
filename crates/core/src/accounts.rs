//! Account rules: username shape, password length, lockout policy and
//! Discord snowflake parsing.

use crate::error::CoreError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 32;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Consecutive failed logins before the account is locked.
pub const MAX_FAILED_LOGINS: i32 = 5;

/// Lock duration once [`MAX_FAILED_LOGINS`] is reached.
pub const LOCKOUT_MINUTES: i64 = 15;

/// Usernames are 3-32 ASCII letters, digits, `_`, `-` or `.`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(CoreError::validation(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(CoreError::validation(
            "Username may only contain letters, digits, '_', '-' and '.'",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Parse a Discord snowflake sent as a decimal string.
///
/// Snowflakes are unsigned 64-bit on Discord's side but every real id fits
/// in `i64`, which is how they are stored.
pub fn parse_snowflake(raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::validation(format!("'{raw}' is not a valid Discord id")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("vex_01").is_ok());
        assert!(validate_username("a.b-c").is_ok());
        assert_matches!(validate_username("ab"), Err(CoreError::Validation(_)));
        assert_matches!(validate_username("has space"), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn password_length() {
        assert!(validate_password("12345678").is_ok());
        assert_matches!(validate_password("short"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn snowflakes() {
        assert_eq!(parse_snowflake("123456789012345678").unwrap(), 123_456_789_012_345_678);
        assert_eq!(parse_snowflake(" 42 ").unwrap(), 42);
        assert!(parse_snowflake("0").is_err());
        assert!(parse_snowflake("-5").is_err());
        assert!(parse_snowflake("abc").is_err());
        assert!(parse_snowflake("18446744073709551615").is_err());
    }
}
