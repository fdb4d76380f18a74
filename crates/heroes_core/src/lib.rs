//! Core domain logic for the heroes API.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod serialize;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Hero, HeroId, HeroPower, HeroPowerId, NewHero, NewHeroPower, NewPower, Power, PowerId,
    PowerUpdate, Strength, ValidationError,
};
pub use repo::{RepoError, RepoResult};
pub use serialize::{to_payload, Graph, SerializeError, SerializeOptions, Serializer};
pub use service::roster_service::{
    RosterService, ServiceError, ServiceResult, SqliteRosterService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
