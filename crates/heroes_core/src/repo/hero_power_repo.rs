//! Hero/power link repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert link rows and load them per hero or per power.
//! - Load each link together with the entity on its far side in one query.
//!
//! # Invariants
//! - Persisted `strength` values are parsed back through `Strength`; any
//!   other stored token is reported as `InvalidData`.
//! - Results are ordered by link id for stable payloads.

use crate::model::{Hero, HeroId, HeroPower, HeroPowerId, NewHeroPower, Power, PowerId, Strength};
use crate::repo::power_repo::parse_power_row;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const HERO_POWER_SELECT_SQL: &str = "SELECT
    hp.id,
    hp.strength,
    hp.hero_id,
    hp.power_id
FROM hero_powers hp";

/// Repository interface for hero/power links.
pub trait HeroPowerRepository {
    fn create_hero_power(&self, link: &NewHeroPower) -> RepoResult<HeroPower>;
    fn get_hero_power(&self, id: HeroPowerId) -> RepoResult<Option<HeroPower>>;
    /// Links owned by one hero, each paired with its power.
    fn list_for_hero(&self, hero_id: HeroId) -> RepoResult<Vec<(HeroPower, Power)>>;
    /// Links owned by one power, each paired with its hero.
    fn list_for_power(&self, power_id: PowerId) -> RepoResult<Vec<(HeroPower, Hero)>>;
}

/// SQLite-backed link repository.
pub struct SqliteHeroPowerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHeroPowerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HeroPowerRepository for SqliteHeroPowerRepository<'_> {
    fn create_hero_power(&self, link: &NewHeroPower) -> RepoResult<HeroPower> {
        self.conn.execute(
            "INSERT INTO hero_powers (strength, hero_id, power_id) VALUES (?1, ?2, ?3);",
            params![link.strength.as_str(), link.hero_id, link.power_id],
        )?;
        Ok(link.into_hero_power(self.conn.last_insert_rowid()))
    }

    fn get_hero_power(&self, id: HeroPowerId) -> RepoResult<Option<HeroPower>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HERO_POWER_SELECT_SQL} WHERE hp.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_hero_power_row(row)?));
        }
        Ok(None)
    }

    fn list_for_hero(&self, hero_id: HeroId) -> RepoResult<Vec<(HeroPower, Power)>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                hp.id AS link_id,
                hp.strength,
                hp.hero_id,
                hp.power_id,
                p.id,
                p.name,
                p.description
             FROM hero_powers hp
             INNER JOIN powers p ON p.id = hp.power_id
             WHERE hp.hero_id = ?1
             ORDER BY hp.id ASC;",
        )?;
        let mut rows = stmt.query([hero_id])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let link = parse_link_columns(row, "link_id")?;
            links.push((link, parse_power_row(row)?));
        }
        Ok(links)
    }

    fn list_for_power(&self, power_id: PowerId) -> RepoResult<Vec<(HeroPower, Hero)>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                hp.id AS link_id,
                hp.strength,
                hp.hero_id,
                hp.power_id,
                h.name,
                h.super_name
             FROM hero_powers hp
             INNER JOIN heroes h ON h.id = hp.hero_id
             WHERE hp.power_id = ?1
             ORDER BY hp.id ASC;",
        )?;
        let mut rows = stmt.query([power_id])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let link = parse_link_columns(row, "link_id")?;
            let hero = Hero {
                id: link.hero_id,
                name: row.get("name")?,
                super_name: row.get("super_name")?,
            };
            links.push((link, hero));
        }
        Ok(links)
    }
}

fn parse_hero_power_row(row: &Row<'_>) -> RepoResult<HeroPower> {
    parse_link_columns(row, "id")
}

fn parse_link_columns(row: &Row<'_>, id_column: &str) -> RepoResult<HeroPower> {
    let id: HeroPowerId = row.get(id_column)?;
    let strength_text: String = row.get("strength")?;
    let strength = strength_text.parse::<Strength>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid strength `{strength_text}` in hero_powers.strength for link {id}"
        ))
    })?;
    Ok(HeroPower::new(
        id,
        strength,
        row.get("hero_id")?,
        row.get("power_id")?,
    ))
}
