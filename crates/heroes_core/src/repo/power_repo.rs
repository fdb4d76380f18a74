//! Power repository contract and SQLite implementation.
//!
//! # Invariants
//! - Only validated `NewPower`/`Power` values are written.
//! - Rows whose description fails validation surface as `InvalidData`.

use crate::model::{NewPower, Power, PowerId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const POWER_SELECT_SQL: &str = "SELECT id, name, description FROM powers";

/// Repository interface for power rows.
pub trait PowerRepository {
    fn create_power(&self, power: &NewPower) -> RepoResult<Power>;
    fn get_power(&self, id: PowerId) -> RepoResult<Option<Power>>;
    /// Lists all powers ordered by id.
    fn list_powers(&self) -> RepoResult<Vec<Power>>;
    /// Persists the mutable fields of an existing power.
    fn update_power(&self, power: &Power) -> RepoResult<()>;
    /// Deletes a power; its links are removed by cascade.
    fn delete_power(&self, id: PowerId) -> RepoResult<()>;
}

/// SQLite-backed power repository.
pub struct SqlitePowerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePowerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PowerRepository for SqlitePowerRepository<'_> {
    fn create_power(&self, power: &NewPower) -> RepoResult<Power> {
        self.conn.execute(
            "INSERT INTO powers (name, description) VALUES (?1, ?2);",
            params![power.name(), power.description()],
        )?;
        Ok(power.clone().into_power(self.conn.last_insert_rowid()))
    }

    fn get_power(&self, id: PowerId) -> RepoResult<Option<Power>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POWER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_power_row(row)?));
        }
        Ok(None)
    }

    fn list_powers(&self) -> RepoResult<Vec<Power>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POWER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut powers = Vec::new();
        while let Some(row) = rows.next()? {
            powers.push(parse_power_row(row)?);
        }
        Ok(powers)
    }

    fn update_power(&self, power: &Power) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE powers SET name = ?1, description = ?2 WHERE id = ?3;",
            params![power.name.as_str(), power.description(), power.id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "power",
                id: power.id,
            });
        }
        Ok(())
    }

    fn delete_power(&self, id: PowerId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM powers WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "power", id });
        }
        Ok(())
    }
}

pub(crate) fn parse_power_row(row: &Row<'_>) -> RepoResult<Power> {
    let id: PowerId = row.get("id")?;
    let name: String = row.get("name")?;
    let description: String = row.get("description")?;
    Power::new(id, name, description).map_err(|err| {
        RepoError::InvalidData(format!("powers.description for power {id}: {err}"))
    })
}
