//! Power domain model.
//!
//! # Responsibility
//! - Hold a describable capability that many heroes can share.
//! - Validate `description` whenever it is assigned.
//!
//! # Invariants
//! - `description` is non-empty and at least [`MIN_DESCRIPTION_CHARS`]
//!   characters long. It is stored exactly as given, without trimming.
//! - A rejected assignment leaves the previous description in place.

use super::validation::ValidationError;
use serde::Serialize;

/// Database row id of a power.
pub type PowerId = i64;

/// Minimum description length, counted in Unicode scalar values.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

const DESCRIPTION_FIELD: &str = "description";

/// Persisted power record.
///
/// `description` is private so every write goes through
/// [`Power::set_description`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Power {
    pub id: PowerId,
    pub name: String,
    description: String,
}

impl Power {
    /// Builds a power record, validating the description.
    pub fn new(
        id: PowerId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        Ok(Self {
            id,
            name: name.into(),
            description,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description if it passes validation.
    pub fn set_description(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        validate_description(&value)?;
        self.description = value;
        Ok(())
    }

    /// Applies an allow-listed partial update.
    pub fn apply(&mut self, update: PowerUpdate) -> Result<(), ValidationError> {
        if let Some(description) = update.description {
            self.set_description(description)?;
        }
        Ok(())
    }
}

/// Insert payload for a power not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPower {
    name: String,
    description: String,
}

impl NewPower {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        Ok(Self {
            name: name.into(),
            description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attaches the id assigned by storage.
    pub fn into_power(self, id: PowerId) -> Power {
        Power {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

/// Fields a caller may change on an existing power.
///
/// Only the description is mutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerUpdate {
    pub description: Option<String>,
}

impl PowerUpdate {
    /// Field names accepted by partial updates.
    pub const FIELDS: &'static [&'static str] = &["description"];

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
    }
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: DESCRIPTION_FIELD,
        });
    }
    if value.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::TooShort {
            field: DESCRIPTION_FIELD,
            min_chars: MIN_DESCRIPTION_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewPower, Power, PowerUpdate, MIN_DESCRIPTION_CHARS};
    use crate::model::ValidationError;

    const VALID: &str = "Can soar through the sky at will";

    #[test]
    fn empty_description_is_rejected_as_empty() {
        let err = NewPower::new("flight", "").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "description"
            }
        );
    }

    #[test]
    fn every_short_description_is_rejected() {
        for len in 1..MIN_DESCRIPTION_CHARS {
            let value = "x".repeat(len);
            let err = NewPower::new("flight", value).unwrap_err();
            assert!(matches!(err, ValidationError::TooShort { min_chars: 20, .. }));
        }
    }

    #[test]
    fn boundary_length_is_accepted_and_stored_verbatim() {
        let value = " ".repeat(MIN_DESCRIPTION_CHARS);
        let power = Power::new(1, "blank", value.clone()).unwrap();
        assert_eq!(power.description(), value);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 19 multi-byte characters are more than 20 bytes but still too short.
        let value = "é".repeat(MIN_DESCRIPTION_CHARS - 1);
        assert!(value.len() >= MIN_DESCRIPTION_CHARS);
        assert!(NewPower::new("accent", value).is_err());
    }

    #[test]
    fn failed_assignment_keeps_previous_description() {
        let mut power = Power::new(1, "flight", VALID).unwrap();
        assert!(power.set_description("").is_err());
        assert!(power.set_description("too short").is_err());
        assert_eq!(power.description(), VALID);

        power
            .set_description("Moves faster than a speeding bullet")
            .unwrap();
        assert_eq!(power.description(), "Moves faster than a speeding bullet");
    }

    #[test]
    fn apply_rejects_invalid_description_and_ignores_empty_update() {
        let mut power = Power::new(1, "flight", VALID).unwrap();
        let err = power
            .apply(PowerUpdate {
                description: Some("short".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { .. }));
        assert_eq!(power.description(), VALID);

        power.apply(PowerUpdate::default()).unwrap();
        assert_eq!(power.description(), VALID);
    }
}
