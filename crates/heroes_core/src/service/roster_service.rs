//! Hero/power roster use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/delete entry points for heroes and powers.
//! - Apply allow-listed partial updates to powers.
//! - Create hero/power links after checking both endpoints exist.
//! - Load entity graphs ready for serialization.
//!
//! # Invariants
//! - Validation runs before any repository write; a rejected write leaves
//!   storage untouched.
//! - Link creation never relies on the foreign-key constraint alone to
//!   report a missing hero or power.

use crate::model::{
    Hero, HeroId, HeroPower, NewHero, NewHeroPower, NewPower, Power, PowerId, PowerUpdate,
    ValidationError,
};
use crate::repo::hero_power_repo::{HeroPowerRepository, SqliteHeroPowerRepository};
use crate::repo::hero_repo::{HeroRepository, SqliteHeroRepository};
use crate::repo::power_repo::{PowerRepository, SqlitePowerRepository};
use crate::repo::RepoError;
use crate::serialize::Graph;
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for roster use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A constrained field rejected its value.
    Validation(ValidationError),
    /// Target hero does not exist.
    HeroNotFound(HeroId),
    /// Target power does not exist.
    PowerNotFound(PowerId),
    /// Link creation referenced a hero or power that does not exist.
    InvalidReference { hero_id: HeroId, power_id: PowerId },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::HeroNotFound(id) => write!(f, "hero not found: {id}"),
            Self::PowerNotFound(id) => write!(f, "power not found: {id}"),
            Self::InvalidReference { hero_id, power_id } => {
                write!(f, "invalid hero or power (hero_id={hero_id}, power_id={power_id})")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent roster state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "hero",
                id,
            } => Self::HeroNotFound(id),
            RepoError::NotFound {
                entity: "power",
                id,
            } => Self::PowerNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Roster service facade over the three repositories.
pub struct RosterService<H, P, L> {
    heroes: H,
    powers: P,
    links: L,
}

/// Roster service bound to one SQLite connection.
pub type SqliteRosterService<'conn> = RosterService<
    SqliteHeroRepository<'conn>,
    SqlitePowerRepository<'conn>,
    SqliteHeroPowerRepository<'conn>,
>;

impl<'conn> SqliteRosterService<'conn> {
    /// Creates a service whose repositories share `conn`.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        RosterService::new(
            SqliteHeroRepository::new(conn),
            SqlitePowerRepository::new(conn),
            SqliteHeroPowerRepository::new(conn),
        )
    }
}

impl<H, P, L> RosterService<H, P, L>
where
    H: HeroRepository,
    P: PowerRepository,
    L: HeroPowerRepository,
{
    pub fn new(heroes: H, powers: P, links: L) -> Self {
        Self {
            heroes,
            powers,
            links,
        }
    }

    pub fn list_heroes(&self) -> ServiceResult<Vec<Hero>> {
        Ok(self.heroes.list_heroes()?)
    }

    pub fn create_hero(&self, hero: &NewHero) -> ServiceResult<Hero> {
        let created = self.heroes.create_hero(hero)?;
        info!("event=hero_create module=service status=ok hero_id={}", created.id);
        Ok(created)
    }

    /// Loads a hero with its links and linked powers.
    pub fn get_hero_graph(&self, id: HeroId) -> ServiceResult<Graph> {
        let hero = self
            .heroes
            .get_hero(id)?
            .ok_or(ServiceError::HeroNotFound(id))?;
        let links = self.links.list_for_hero(id)?;
        Ok(Graph::for_hero(hero, links))
    }

    pub fn delete_hero(&self, id: HeroId) -> ServiceResult<()> {
        self.heroes.delete_hero(id)?;
        info!("event=hero_delete module=service status=ok hero_id={id}");
        Ok(())
    }

    pub fn list_powers(&self) -> ServiceResult<Vec<Power>> {
        Ok(self.powers.list_powers()?)
    }

    pub fn get_power(&self, id: PowerId) -> ServiceResult<Power> {
        self.powers
            .get_power(id)?
            .ok_or(ServiceError::PowerNotFound(id))
    }

    /// Loads a power with its links and linked heroes.
    pub fn get_power_graph(&self, id: PowerId) -> ServiceResult<Graph> {
        let power = self.get_power(id)?;
        let links = self.links.list_for_power(id)?;
        Ok(Graph::for_power(power, links))
    }

    pub fn create_power(&self, power: &NewPower) -> ServiceResult<Power> {
        let created = self.powers.create_power(power)?;
        info!(
            "event=power_create module=service status=ok power_id={}",
            created.id
        );
        Ok(created)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Validation happens on the in-memory record first, so a rejected
    /// value never reaches storage.
    pub fn update_power(&self, id: PowerId, update: PowerUpdate) -> ServiceResult<Power> {
        let mut power = self.get_power(id)?;
        if let Err(err) = power.apply(update) {
            warn!(
                "event=power_update module=service status=rejected power_id={id} field={}",
                err.field()
            );
            return Err(err.into());
        }
        self.powers.update_power(&power)?;
        info!("event=power_update module=service status=ok power_id={id}");

        self.powers
            .get_power(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated power not found in read-back",
            ))
    }

    pub fn delete_power(&self, id: PowerId) -> ServiceResult<()> {
        self.powers.delete_power(id)?;
        info!("event=power_delete module=service status=ok power_id={id}");
        Ok(())
    }

    /// Links a hero to a power at the given raw strength.
    ///
    /// # Contract
    /// - Strength is validated first; an invalid token fails with
    ///   `Validation` even when the ids are also wrong.
    /// - Missing hero or power fails with `InvalidReference`.
    /// - Returns a graph holding the new link and both endpoints.
    pub fn create_hero_power(
        &self,
        strength: &str,
        hero_id: HeroId,
        power_id: PowerId,
    ) -> ServiceResult<(HeroPower, Graph)> {
        let new_link = NewHeroPower::parse(strength, hero_id, power_id).map_err(|err| {
            warn!(
                "event=hero_power_create module=service status=rejected reason=invalid_strength"
            );
            err
        })?;

        let hero = self.heroes.get_hero(hero_id)?;
        let power = self.powers.get_power(power_id)?;
        let (Some(hero), Some(power)) = (hero, power) else {
            warn!(
                "event=hero_power_create module=service status=rejected reason=invalid_reference hero_id={hero_id} power_id={power_id}"
            );
            return Err(ServiceError::InvalidReference { hero_id, power_id });
        };

        let link = self.links.create_hero_power(&new_link)?;
        info!(
            "event=hero_power_create module=service status=ok link_id={} hero_id={hero_id} power_id={power_id}",
            link.id
        );
        Ok((link.clone(), Graph::for_link(link, hero, power)))
    }
}
