//! Application context shared by request handlers.
//!
//! # Responsibility
//! - Open the store once at startup and close it on shutdown.
//! - Hand each request exclusive access to the connection for its
//!   synchronous store work.
//!
//! # Invariants
//! - The connection lock is never held across an `.await`.
//! - Async callers reach the store through [`AppContext::spawn_roster`],
//!   which runs on tokio's blocking pool; lock waits and SQLite
//!   `busy_timeout` waits never occupy an async worker thread.

use heroes_core::db::{open_from_uri, DbError};
use heroes_core::SqliteRosterService;
use log::info;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinError;

/// Process-wide state handed to every handler.
pub struct AppContext {
    conn: Mutex<Connection>,
}

impl AppContext {
    /// Opens (and migrates) the store named by `database_uri`.
    pub fn open(database_uri: &str) -> Result<Self, DbError> {
        Ok(Self::from_connection(open_from_uri(database_uri)?))
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `work` with a roster service bound to the store.
    ///
    /// A poisoned lock is recovered: every store write is a single statement
    /// or transaction, so a panicking handler cannot leave partial state.
    pub fn with_roster<T, E>(
        &self,
        work: impl FnOnce(&SqliteRosterService<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let service = SqliteRosterService::sqlite(&conn);
        work(&service)
    }

    /// Runs [`with_roster`](Self::with_roster) on the blocking thread pool.
    ///
    /// The outer error is set only when `work` panicked.
    pub async fn spawn_roster<T, E, F>(self: &Arc<Self>, work: F) -> Result<Result<T, E>, JoinError>
    where
        F: FnOnce(&SqliteRosterService<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let ctx = Arc::clone(self);
        tokio::task::spawn_blocking(move || ctx.with_roster(work)).await
    }

    /// Closes the store connection.
    pub fn close(self) -> Result<(), DbError> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
        info!("event=db_close module=api status=ok");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AppContext;
    use heroes_core::{NewHero, ServiceError};
    use std::sync::Arc;

    #[test]
    fn open_memory_store_and_close() {
        let ctx = AppContext::open("sqlite::memory:").unwrap();
        let heroes = ctx
            .with_roster(|roster| roster.list_heroes())
            .unwrap();
        assert!(heroes.is_empty());
        ctx.close().unwrap();
    }

    #[test]
    fn writes_are_visible_to_later_requests() {
        let ctx = AppContext::open("sqlite::memory:").unwrap();
        let created = ctx
            .with_roster(|roster| roster.create_hero(&NewHero::new("Bruce", "Batman")))
            .unwrap();
        let loaded = ctx
            .with_roster(|roster| roster.get_hero_graph(created.id))
            .unwrap();
        assert!(loaded.hero(created.id).is_some());
    }

    #[tokio::test]
    async fn spawned_store_work_sees_committed_rows() {
        let ctx = Arc::new(AppContext::open("sqlite::memory:").unwrap());
        let created = ctx
            .spawn_roster(|roster| roster.create_hero(&NewHero::new("Bruce", "Batman")))
            .await
            .unwrap()
            .unwrap();
        let heroes = ctx
            .spawn_roster(|roster| roster.list_heroes())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(heroes, vec![created]);
    }

    #[tokio::test]
    async fn panicking_store_work_surfaces_as_join_error() {
        let ctx = Arc::new(AppContext::open("sqlite::memory:").unwrap());
        let outcome = ctx
            .spawn_roster(|_| -> Result<(), ServiceError> { panic!("store work failed") })
            .await;
        assert!(outcome.is_err());

        let heroes = ctx.with_roster(|roster| roster.list_heroes()).unwrap();
        assert!(heroes.is_empty());
    }

    #[test]
    fn open_rejects_unsupported_uri() {
        assert!(AppContext::open("postgres://localhost/heroes").is_err());
    }
}
