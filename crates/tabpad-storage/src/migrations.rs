//! Database migrations
//!
//! The schema version lives in SQLite's `user_version` pragma. Each entry in
//! `MIGRATIONS` upgrades the schema by one version.

use crate::Result;
use rusqlite::Connection;

type Migration = fn(&Connection) -> Result<()>;

const MIGRATIONS: &[(&str, Migration)] = &[("key-value entries", migrate_v1)];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (index, (name, migrate)) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index + 1;
        tracing::info!(version, "Running migration: {}", name);

        migrate(conn)?;
        conn.pragma_update(None, "user_version", version as i64)?;
    }

    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;

    Ok(())
}
