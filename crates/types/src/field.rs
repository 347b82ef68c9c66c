//! Form fields that server validation errors can target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A form field recognized by the validation error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone", alias = "phoneNumber")]
    Phone,
    #[serde(rename = "userName")]
    UserName,
    #[serde(rename = "password")]
    Password,
}

impl FormField {
    /// The field name as used by the form model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::UserName => "userName",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a server error type names no known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl std::str::FromStr for FormField {
    type Err = UnknownField;

    /// Parse a server error type into a [`FormField`].
    ///
    /// `phone` and `phoneNumber` both resolve to [`FormField::Phone`].
    ///
    /// # Errors
    ///
    /// Returns [`UnknownField`] if the string names no recognized field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" | "phoneNumber" => Ok(Self::Phone),
            "userName" => Ok(Self::UserName),
            "password" => Ok(Self::Password),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Where a field error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Attached by code after a server response, not by schema validation.
    Manual,
}

/// An error attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    /// A manual error carrying a server-supplied message.
    pub fn manual(message: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Manual,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_fields() {
        assert_eq!("email".parse::<FormField>(), Ok(FormField::Email));
        assert_eq!("phone".parse::<FormField>(), Ok(FormField::Phone));
        assert_eq!("phoneNumber".parse::<FormField>(), Ok(FormField::Phone));
        assert_eq!("userName".parse::<FormField>(), Ok(FormField::UserName));
        assert_eq!("password".parse::<FormField>(), Ok(FormField::Password));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Email".parse::<FormField>().is_err());
        assert!("username".parse::<FormField>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for field in [
            FormField::Email,
            FormField::Phone,
            FormField::UserName,
            FormField::Password,
        ] {
            assert_eq!(field.to_string().parse::<FormField>(), Ok(field));
        }
    }

    #[test]
    fn test_manual_field_error_serializes_type() {
        let err = FieldError::manual("Incorrect password");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "manual");
        assert_eq!(json["message"], "Incorrect password");
    }
}
