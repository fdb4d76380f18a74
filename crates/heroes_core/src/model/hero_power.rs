//! Hero/power link model.
//!
//! # Responsibility
//! - Record one hero's possession of one power at a given [`Strength`].
//!
//! # Invariants
//! - `strength` is always one of the [`Strength`] tokens; raw strings are
//!   parsed case-sensitively before they can reach a record.
//! - Both foreign keys are required.

use super::hero::HeroId;
use super::power::PowerId;
use super::validation::ValidationError;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Database row id of a hero/power link.
pub type HeroPowerId = i64;

const STRENGTH_FIELD: &str = "strength";

/// How strongly a hero wields a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    Strong,
    Average,
    Weak,
}

impl Strength {
    /// Accepted wire/storage tokens, in declaration order.
    pub const TOKENS: &'static [&'static str] = &["Strong", "Average", "Weak"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Average => "Average",
            Self::Weak => "Weak",
        }
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Strong" => Ok(Self::Strong),
            "Average" => Ok(Self::Average),
            "Weak" => Ok(Self::Weak),
            other => Err(ValidationError::NotAllowed {
                field: STRENGTH_FIELD,
                value: other.to_string(),
                allowed: Self::TOKENS,
            }),
        }
    }
}

/// Persisted link record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroPower {
    pub id: HeroPowerId,
    strength: Strength,
    pub hero_id: HeroId,
    pub power_id: PowerId,
}

impl HeroPower {
    pub fn new(id: HeroPowerId, strength: Strength, hero_id: HeroId, power_id: PowerId) -> Self {
        Self {
            id,
            strength,
            hero_id,
            power_id,
        }
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Parses and assigns a raw strength token.
    ///
    /// On error the previous strength is kept.
    pub fn set_strength(&mut self, value: &str) -> Result<(), ValidationError> {
        self.strength = value.parse()?;
        Ok(())
    }
}

/// Insert payload for a link not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHeroPower {
    pub strength: Strength,
    pub hero_id: HeroId,
    pub power_id: PowerId,
}

impl NewHeroPower {
    /// Validates a raw strength token and builds the insert payload.
    pub fn parse(strength: &str, hero_id: HeroId, power_id: PowerId) -> Result<Self, ValidationError> {
        Ok(Self {
            strength: strength.parse()?,
            hero_id,
            power_id,
        })
    }

    /// Attaches the id assigned by storage.
    pub fn into_hero_power(self, id: HeroPowerId) -> HeroPower {
        HeroPower::new(id, self.strength, self.hero_id, self.power_id)
    }
}
