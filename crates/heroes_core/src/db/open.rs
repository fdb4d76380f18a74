//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Resolve database locations from connection strings.
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const SQLITE_URI_PREFIX: &str = "sqlite:///";
const SQLITE_MEMORY_URIS: &[&str] = &["sqlite://", "sqlite::memory:", ":memory:"];

/// Where the store lives, resolved from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    /// Parses `sqlite:///path`, `sqlite::memory:` or a bare filesystem path.
    ///
    /// `sqlite:///app.db` is relative to the working directory and
    /// `sqlite:////var/lib/app.db` is absolute. Other URI schemes are
    /// rejected because only SQLite is supported.
    pub fn parse(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidUri(uri.to_string()));
        }
        if SQLITE_MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }
        if let Some(path) = trimmed.strip_prefix(SQLITE_URI_PREFIX) {
            if path.is_empty() {
                return Err(DbError::InvalidUri(uri.to_string()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if trimmed.contains("://") {
            return Err(DbError::InvalidUri(uri.to_string()));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens the database named by a connection string.
pub fn open_from_uri(uri: &str) -> DbResult<Connection> {
    match DatabaseLocation::parse(uri)? {
        DatabaseLocation::File(path) => open_db(path),
        DatabaseLocation::Memory => open_db_in_memory(),
    }
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let location = DatabaseLocation::File(path.as_ref().to_path_buf());
    open_with(&location, || Connection::open(path.as_ref()))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(&DatabaseLocation::Memory, Connection::open_in_memory)
}

fn open_with(
    location: &DatabaseLocation,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
