//! Input validation for account and profile fields.

use thiserror::Error;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum first/last name length.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum bio length.
pub const MAX_BIO_LENGTH: usize = 500;

/// Maximum avatar reference length.
pub const MAX_AVATAR_LENGTH: usize = 255;

/// Maximum status message length.
pub const MAX_STATUS_MESSAGE_LENGTH: usize = 255;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username cannot be empty")]
    UsernameEmpty,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username can only contain letters, digits and @/./+/-/_")]
    UsernameInvalidChars,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password is the same as username.
    #[error("password cannot be the same as username")]
    PasswordSameAsUsername,

    /// A name field is empty.
    #[error("{0} cannot be empty")]
    NameEmpty(&'static str),

    /// A name field is too long.
    #[error("{0} must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong(&'static str),

    /// A name field contains control characters.
    #[error("{0} contains invalid characters")]
    NameInvalidChars(&'static str),

    /// Email is empty.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// A profile field exceeds its limit.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Limit in characters.
        max: usize,
    },
}

impl ValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameEmpty | Self::UsernameTooLong | Self::UsernameInvalidChars => "username",
            Self::PasswordTooShort | Self::PasswordTooLong | Self::PasswordSameAsUsername => {
                "password"
            }
            Self::NameEmpty(field) | Self::NameTooLong(field) | Self::NameInvalidChars(field) => {
                field
            }
            Self::EmailEmpty | Self::EmailTooLong | Self::EmailInvalidFormat => "email",
            Self::FieldTooLong { field, .. } => field,
        }
    }
}

/// Validate a username.
///
/// 1-150 characters of ASCII letters, digits and `@ . + - _`.
///
/// ```
/// use auth_service::auth::validation::validate_username;
///
/// assert!(validate_username("john.doe+work@home").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username("john doe").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate a password for registration.
///
/// 8-128 characters and not equal to the username (case-insensitive).
pub fn validate_registration_password(
    password: &str,
    username: Option<&str>,
) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    if let Some(user) = username {
        if password.eq_ignore_ascii_case(user) {
            return Err(ValidationError::PasswordSameAsUsername);
        }
    }

    Ok(())
}

/// Validate a first or last name: 1-150 characters, no control characters.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameEmpty(field));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong(field));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::NameInvalidChars(field));
    }
    Ok(())
}

/// Validate a required email address.
///
/// The format check is basic: one `@`, a non-empty local part, a dotted
/// domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if !domain.contains('.') || domain.split('.').any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

fn validate_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Validate a bio (at most 500 characters).
pub fn validate_bio(bio: &str) -> Result<(), ValidationError> {
    validate_max_len("bio", bio, MAX_BIO_LENGTH)
}

/// Validate an avatar reference (at most 255 characters).
pub fn validate_avatar(avatar: &str) -> Result<(), ValidationError> {
    validate_max_len("avatar", avatar, MAX_AVATAR_LENGTH)
}

/// Validate a status message (at most 255 characters).
pub fn validate_status_message(status: &str) -> Result<(), ValidationError> {
    validate_max_len("status_message", status, MAX_STATUS_MESSAGE_LENGTH)
}

/// Validate all registration fields at once.
///
/// Returns the first error encountered.
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_registration_password(password, Some(username))?;
    validate_email(email)?;
    validate_name("first_name", first_name)?;
    validate_name("last_name", last_name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("a").is_ok());
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("jane.doe+tag@host-1").is_ok());
        assert!(validate_username(&"a".repeat(150)).is_ok());
    }

    #[test]
    fn test_validate_username_invalid() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameEmpty));
        assert_eq!(
            validate_username(&"a".repeat(151)),
            Err(ValidationError::UsernameTooLong)
        );
        for bad in ["john doe", "john!", "jöhn", "a/b"] {
            assert_eq!(
                validate_username(bad),
                Err(ValidationError::UsernameInvalidChars),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_registration_password("secure_pass123", Some("john")).is_ok());
        assert_eq!(
            validate_registration_password("short", None),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_registration_password(&"a".repeat(129), None),
            Err(ValidationError::PasswordTooLong)
        );
        assert_eq!(
            validate_registration_password("JohnSmith", Some("johnsmith")),
            Err(ValidationError::PasswordSameAsUsername)
        );
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("first_name", "Zoë").is_ok());
        assert_eq!(
            validate_name("first_name", "  "),
            Err(ValidationError::NameEmpty("first_name"))
        );
        assert_eq!(
            validate_name("last_name", &"x".repeat(151)),
            Err(ValidationError::NameTooLong("last_name"))
        );
        assert_eq!(
            validate_name("last_name", "a\tb"),
            Err(ValidationError::NameInvalidChars("last_name"))
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());

        assert_eq!(validate_email(""), Err(ValidationError::EmailEmpty));
        for bad in [
            "invalid",
            "@example.com",
            "user@localhost",
            "user@example..com",
            "user@@example.com",
            "us er@example.com",
        ] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::EmailInvalidFormat),
                "{bad} should be rejected"
            );
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_profile_field_limits() {
        assert!(validate_bio(&"b".repeat(500)).is_ok());
        assert_eq!(
            validate_bio(&"b".repeat(501)),
            Err(ValidationError::FieldTooLong {
                field: "bio",
                max: 500
            })
        );
        assert!(validate_avatar(&"a".repeat(255)).is_ok());
        assert!(validate_avatar(&"a".repeat(256)).is_err());
        assert!(validate_status_message("").is_ok());
        assert!(validate_status_message(&"s".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_registration_fails_on_first_error() {
        assert!(validate_registration("alice", "password123", "a@b.io", "Alice", "L").is_ok());

        let result = validate_registration("", "short", "bad", "", "");
        assert_eq!(result, Err(ValidationError::UsernameEmpty));
    }

    #[test]
    fn test_error_field_names() {
        assert_eq!(ValidationError::UsernameTooLong.field(), "username");
        assert_eq!(ValidationError::PasswordTooShort.field(), "password");
        assert_eq!(ValidationError::NameEmpty("last_name").field(), "last_name");
        assert_eq!(ValidationError::EmailInvalidFormat.field(), "email");
        assert_eq!(
            ValidationError::FieldTooLong {
                field: "bio",
                max: 500
            }
            .field(),
            "bio"
        );
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::NameTooLong("first_name").to_string(),
            "first_name must be at most 150 characters"
        );
        assert_eq!(
            ValidationError::FieldTooLong {
                field: "bio",
                max: 500
            }
            .to_string(),
            "bio must be at most 500 characters"
        );
    }
}
