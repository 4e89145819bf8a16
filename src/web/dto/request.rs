//! Request DTOs for Web API.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::auth::{ProfileChanges, RegistrationRequest};

/// Distinguish an absent field (None) from an explicit null (Some(None)).
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Logout request.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to invalidate.
    #[serde(default)]
    pub refresh_token: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 1, max = 150, message = "Must be 1-150 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(
        min = 8,
        max = 128,
        message = "Must be 8-128 characters"
    ))]
    pub password: String,
    /// Email address.
    #[validate(
        email(message = "Must be a valid email address"),
        length(max = 254)
    )]
    pub email: String,
    /// Given name.
    #[validate(length(min = 1, max = 150, message = "Must be 1-150 characters"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 150, message = "Must be 1-150 characters"))]
    pub last_name: String,
}

impl From<RegisterRequest> for RegistrationRequest {
    fn from(req: RegisterRequest) -> Self {
        RegistrationRequest::new(req.username, req.password, req.email)
            .with_name(req.first_name, req.last_name)
    }
}

/// Profile update request (PUT and PATCH).
///
/// Absent fields are left unchanged. For the optional profile fields an
/// explicit `null` clears the value. Their length limits are checked by
/// `ProfileChanges::validate`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New email.
    #[validate(length(max = 254))]
    pub email: Option<String>,
    /// New first name.
    #[validate(length(min = 1, max = 150))]
    pub first_name: Option<String>,
    /// New last name.
    #[validate(length(min = 1, max = 150))]
    pub last_name: Option<String>,
    /// New bio.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub bio: Option<Option<String>>,
    /// New avatar reference.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub avatar: Option<Option<String>>,
    /// New birthday (YYYY-MM-DD).
    #[serde(default, deserialize_with = "deserialize_some")]
    pub birthday: Option<Option<NaiveDate>>,
    /// New status message.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub status_message: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            avatar: req.avatar,
            birthday: req.birthday,
            status_message: req.status_message,
        }
    }
}

/// Contact request.
#[derive(Debug, Deserialize)]
pub struct SendContactRequest {
    /// Addressee user ID.
    pub to_user: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_absent_vs_null() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"bio": null, "status_message": "hi"}"#).unwrap();

        assert_eq!(req.bio, Some(None));
        assert_eq!(req.status_message, Some(Some("hi".to_string())));
        assert!(req.avatar.is_none());
        assert!(req.birthday.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn test_update_profile_birthday() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"birthday": "1990-05-17"}"#).unwrap();
        assert_eq!(req.birthday, Some(NaiveDate::from_ymd_opt(1990, 5, 17)));

        assert!(serde_json::from_str::<UpdateProfileRequest>(r#"{"birthday": "17/05/1990"}"#)
            .is_err());
    }

    #[test]
    fn test_update_profile_name_limits() {
        let req = UpdateProfileRequest {
            first_name: Some(String::new()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));

        let req = UpdateProfileRequest {
            bio: Some(None),
            first_name: Some("Al".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_profile_into_changes() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"last_name": "L", "avatar": "a.png"}"#).unwrap();
        let changes: ProfileChanges = req.into();

        assert_eq!(changes.last_name.as_deref(), Some("L"));
        assert_eq!(changes.avatar, Some(Some("a.png".to_string())));
        assert!(changes.bio.is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "short".to_string(),
            email: "not-an-email".to_string(),
            first_name: "Alice".to_string(),
            last_name: String::new(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("last_name"));
        assert!(!fields.contains_key("username"));
    }

    #[test]
    fn test_register_request_into_domain() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
        };
        let domain: RegistrationRequest = req.into();

        assert_eq!(domain.username, "alice");
        assert_eq!(domain.last_name, "Liddell");
    }
}
