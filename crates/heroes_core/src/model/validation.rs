//! Field-level validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection of a value assigned to a constrained field.
///
/// The rejected assignment never reaches the record; the field keeps its
/// previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field requires a non-empty value.
    Empty { field: &'static str },
    /// Field value is shorter than the required minimum (in characters).
    TooShort { field: &'static str, min_chars: usize },
    /// Field value is not one of a fixed set of tokens.
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

impl ValidationError {
    /// Name of the rejected field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooShort { field, .. } | Self::NotAllowed { field, .. } => {
                field
            }
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::TooShort { field, min_chars } => {
                write!(f, "{field} must be at least {min_chars} characters")
            }
            Self::NotAllowed { field, allowed, .. } => {
                let quoted = allowed
                    .iter()
                    .map(|token| format!("'{token}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{field} must be one of the following: {quoted}")
            }
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::Empty {
                field: "description"
            }
            .to_string(),
            "description cannot be empty"
        );
        assert_eq!(
            ValidationError::TooShort {
                field: "description",
                min_chars: 20
            }
            .to_string(),
            "description must be at least 20 characters"
        );
    }

    #[test]
    fn not_allowed_lists_every_token() {
        let err = ValidationError::NotAllowed {
            field: "strength",
            value: "Invincible".to_string(),
            allowed: &["Strong", "Average", "Weak"],
        };
        assert_eq!(
            err.to_string(),
            "strength must be one of the following: 'Strong', 'Average', 'Weak'"
        );
        assert_eq!(err.field(), "strength");
    }
}
