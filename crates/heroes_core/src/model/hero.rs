//! Hero domain model.
//!
//! A hero is the named subject that can possess many powers through
//! [`HeroPower`](super::HeroPower) links. Names are not unique.

use serde::Serialize;

/// Database row id of a hero.
pub type HeroId = i64;

/// Persisted hero record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub id: HeroId,
    /// Civilian name.
    pub name: String,
    /// Secondary (super hero) name.
    pub super_name: String,
}

/// Insert payload for a hero not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHero {
    pub name: String,
    pub super_name: String,
}

impl NewHero {
    pub fn new(name: impl Into<String>, super_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: super_name.into(),
        }
    }

    /// Attaches the id assigned by storage.
    pub fn into_hero(self, id: HeroId) -> Hero {
        Hero {
            id,
            name: self.name,
            super_name: self.super_name,
        }
    }
}
