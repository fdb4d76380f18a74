//! Hero repository contract and SQLite implementation.

use crate::model::{Hero, HeroId, NewHero};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const HERO_SELECT_SQL: &str = "SELECT id, name, super_name FROM heroes";

/// Repository interface for hero rows.
pub trait HeroRepository {
    fn create_hero(&self, hero: &NewHero) -> RepoResult<Hero>;
    fn get_hero(&self, id: HeroId) -> RepoResult<Option<Hero>>;
    /// Lists all heroes ordered by id.
    fn list_heroes(&self) -> RepoResult<Vec<Hero>>;
    /// Deletes a hero; its links are removed by cascade.
    fn delete_hero(&self, id: HeroId) -> RepoResult<()>;
}

/// SQLite-backed hero repository.
pub struct SqliteHeroRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHeroRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HeroRepository for SqliteHeroRepository<'_> {
    fn create_hero(&self, hero: &NewHero) -> RepoResult<Hero> {
        self.conn.execute(
            "INSERT INTO heroes (name, super_name) VALUES (?1, ?2);",
            params![hero.name.as_str(), hero.super_name.as_str()],
        )?;
        Ok(hero.clone().into_hero(self.conn.last_insert_rowid()))
    }

    fn get_hero(&self, id: HeroId) -> RepoResult<Option<Hero>> {
        let hero = self
            .conn
            .query_row(
                &format!("{HERO_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_hero_row,
            )
            .optional()?;
        Ok(hero)
    }

    fn list_heroes(&self) -> RepoResult<Vec<Hero>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HERO_SELECT_SQL} ORDER BY id ASC;"))?;
        let heroes = stmt
            .query_map([], parse_hero_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(heroes)
    }

    fn delete_hero(&self, id: HeroId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM heroes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "hero", id });
        }
        Ok(())
    }
}

fn parse_hero_row(row: &Row<'_>) -> rusqlite::Result<Hero> {
    Ok(Hero {
        id: row.get("id")?,
        name: row.get("name")?,
        super_name: row.get("super_name")?,
    })
}
