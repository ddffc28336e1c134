//! Database connection and schema management
use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open an async connection to the SQLite database at `db_path`
pub async fn async_db(db_path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let db = Connection::open(db_path).await?;
    db.call(|conn| {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create the schema if it doesn't already exist. Safe to run on every
/// startup.
pub fn initialize_db(conn: &mut rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        r"
      CREATE TABLE IF NOT EXISTS event (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        is_specific_dates INTEGER NOT NULL DEFAULT 0,
        dates TEXT NOT NULL
      );

      CREATE TABLE IF NOT EXISTS event_response (
        event_id TEXT NOT NULL REFERENCES event(id),
        user_id TEXT,
        alias TEXT NOT NULL,
        availabilities TEXT NOT NULL,
        PRIMARY KEY (event_id, alias)
      );
    ",
    )?;
    Ok(())
}

/// Apply schema changes to an existing database. Every statement is
/// idempotent so this can be re-run freely.
pub fn migrate_db(conn: &mut rusqlite::Connection) -> Result<()> {
    initialize_db(conn)
}
