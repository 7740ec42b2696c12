//! Notebook schema history.
//!
//! `0001_init` creates the `user`, `note_collection` and `note` tables with
//! restricting foreign keys. `0002_parent_indexes` indexes both foreign-key
//! columns for the per-parent listing queries.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - `PRAGMA user_version` equals the last applied step.
//! - All pending steps commit together or not at all.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "parent_indexes",
        sql: include_str!("0002_parent_indexes.sql"),
    },
];

/// Returns the newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the notebook schema up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let steps = pending(current)?;
    if steps.is_empty() {
        debug!("event=db_migrate module=db status=skip version={current}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in steps {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={current} to_version={}",
        latest_version()
    );
    Ok(())
}

fn pending(current: u32) -> DbResult<&'static [Migration]> {
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    // Versions are contiguous from 1, so the index of `current + 1` is `current`.
    Ok(&MIGRATIONS[current as usize..])
}
