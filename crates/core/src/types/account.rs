//! Account input types: email addresses and sign-up requests.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::status::UserRole;

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must look like name@domain")]
    Malformed,
}

/// A trimmed email address with a non-empty local part and domain.
///
/// ```
/// use tastebud_core::Email;
///
/// assert!(Email::parse("diner@example.com").is_ok());
/// assert!(Email::parse("  diner@example.com ").is_ok());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or is not
    /// of the form `local@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors from validating a [`Registration`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("username is required")]
    MissingUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("phone number is required")]
    MissingPhone,
}

/// A validated sign-up request, ready to forward to the backend.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub phone: String,
    pub role: UserRole,
}

impl Registration {
    /// Backend column limit for `USER_NAME`.
    pub const MAX_USERNAME_LENGTH: usize = 50;
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Validate raw form input.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a [`RegistrationError`].
    pub fn new(
        username: &str,
        email: &str,
        password: String,
        phone: &str,
        role: UserRole,
    ) -> Result<Self, RegistrationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationError::MissingUsername);
        }
        if username.chars().count() > Self::MAX_USERNAME_LENGTH {
            return Err(RegistrationError::UsernameTooLong {
                max: Self::MAX_USERNAME_LENGTH,
            });
        }
        let email = Email::parse(email)?;
        if password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::PasswordTooShort {
                min: Self::MIN_PASSWORD_LENGTH,
            });
        }
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(RegistrationError::MissingPhone);
        }

        Ok(Self {
            username: username.to_owned(),
            email,
            password,
            phone: phone.to_owned(),
            role,
        })
    }
}
