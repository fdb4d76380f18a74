//! Domain model for heroes, powers and the links between them.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and serializers.
//! - Enforce field constraints at assignment time.
//!
//! # Invariants
//! - A `Power` never holds a description shorter than
//!   [`power::MIN_DESCRIPTION_CHARS`] characters.
//! - A `HeroPower` never holds a strength outside [`Strength`].

pub mod hero;
pub mod hero_power;
pub mod power;
pub mod validation;

pub use hero::{Hero, HeroId, NewHero};
pub use hero_power::{HeroPower, HeroPowerId, NewHeroPower, Strength};
pub use power::{NewPower, Power, PowerId, PowerUpdate};
pub use validation::ValidationError;
