//! Generic SQLite repository.
//!
//! # Responsibility
//! - Implement `Repository` once for every entity with a `SqliteTable`
//!   mapping.
//! - Translate foreign-key constraint failures into semantic errors.
//!
//! # Invariants
//! - Audit columns are written by SQL only, never bound from the entity.
//! - Updates never move a row to another parent.

use crate::model::{Audit, Entity};
use crate::repo::{RepoError, RepoResult, Repository};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;

const NOW_MS_SQL: &str = "(CAST(unixepoch('subsec') * 1000 AS INTEGER))";

/// Parent link stored in one column of a child table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentColumn {
    pub column: &'static str,
    pub entity: &'static str,
}

/// Table mapping for an entity persisted through `SqliteRepository`.
pub trait SqliteTable: Entity<Id = i64> {
    /// Table name, quoted when it collides with SQL keywords.
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Writable columns, excluding the identity and audit columns.
    const COLUMNS: &'static [&'static str];
    const PARENT: Option<ParentColumn> = None;

    /// Values bound to `COLUMNS`, in the same order.
    fn column_values(&self) -> Vec<Value>;

    /// Parent id bound to `PARENT.column`.
    fn parent_id(&self) -> Option<i64> {
        None
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// SQLite-backed repository for any `SqliteTable` entity.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: SqliteTable> SqliteRepository<'conn, E> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Rows whose `column` equals `value`, ascending by identity.
    pub(crate) fn find_where(&self, column: &str, value: i64) -> RepoResult<Vec<E>> {
        let sql = format!(
            "{} WHERE {column} = ?1 ORDER BY {} ASC;",
            select_sql::<E>(),
            E::ID_COLUMN
        );
        self.query(&sql, vec![Value::Integer(value)])
    }

    pub(crate) fn count_where(&self, column: &str, value: i64) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {column} = ?1;", E::TABLE);
        let count: i64 = self.conn.query_row(&sql, [value], |row| row.get(0))?;
        to_count(count)
    }

    fn query(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<E>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(E::from_row(row)?);
        }
        Ok(entities)
    }

    fn insert(&self, entity: &E) -> RepoResult<i64> {
        self.conn
            .execute(&insert_sql::<E>(), params_from_iter(entity.column_values()))
            .map_err(|err| write_error(entity, err))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: i64, entity: &E) -> RepoResult<()> {
        if let Some(parent) = E::PARENT {
            let stored: Option<i64> = self
                .conn
                .query_row(
                    &format!(
                        "SELECT {} FROM {} WHERE {} = ?1;",
                        parent.column,
                        E::TABLE,
                        E::ID_COLUMN
                    ),
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            match stored {
                None => return Err(RepoError::NotFound { entity: E::NAME, id }),
                Some(parent_id) if Some(parent_id) != entity.parent_id() => {
                    return Err(RepoError::OwnerReassignment { entity: E::NAME, id });
                }
                Some(_) => {}
            }
        }

        let mut bind_values = entity.column_values();
        bind_values.push(Value::Integer(id));
        let changed = self
            .conn
            .execute(&update_sql::<E>(), params_from_iter(bind_values))
            .map_err(|err| write_error(entity, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: E::NAME, id });
        }
        Ok(())
    }
}

impl<E: SqliteTable> Repository<E> for SqliteRepository<'_, E> {
    fn save(&self, entity: &E) -> RepoResult<E> {
        entity.validate()?;

        let (op, result) = match entity.id() {
            None => ("insert", self.insert(entity)),
            Some(id) => ("update", self.update(id, entity).map(|()| id)),
        };
        let id = match result {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    "event=repo_save module=repo status=error entity={} op={op} error={err}",
                    E::NAME
                );
                return Err(err);
            }
        };
        debug!(
            "event=repo_save module=repo status=ok entity={} op={op} id={id}",
            E::NAME
        );

        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("{} {id} missing in read-back", E::NAME))
        })
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<E>> {
        let sql = format!("{} WHERE {} = ?1;", select_sql::<E>(), E::ID_COLUMN);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<E>> {
        let sql = format!("{} ORDER BY {} ASC;", select_sql::<E>(), E::ID_COLUMN);
        self.query(&sql, Vec::new())
    }

    fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1;", E::TABLE, E::ID_COLUMN);
        let changed = self.conn.execute(&sql, [id]).map_err(|err| {
            if is_foreign_key_violation(&err) {
                RepoError::StillReferenced { entity: E::NAME, id }
            } else {
                err.into()
            }
        })?;
        debug!(
            "event=repo_delete module=repo status=ok entity={} id={id} removed={}",
            E::NAME,
            changed > 0
        );
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {};", E::TABLE);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        to_count(count)
    }
}

/// Reads the shared `created_at`/`updated_at` columns.
pub(crate) fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<Audit> {
    Ok(Audit::new(row.get("created_at")?, row.get("updated_at")?))
}

fn select_sql<E: SqliteTable>() -> String {
    let mut columns = vec![E::ID_COLUMN];
    columns.extend_from_slice(E::COLUMNS);
    columns.extend(["created_at", "updated_at"]);
    format!("SELECT {} FROM {}", columns.join(", "), E::TABLE)
}

fn insert_sql<E: SqliteTable>() -> String {
    if E::COLUMNS.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES;", E::TABLE);
    }
    let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql<E: SqliteTable>() -> String {
    let mut assignments: Vec<String> = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect();
    assignments.push(format!("updated_at = {NOW_MS_SQL}"));
    format!(
        "UPDATE {} SET {} WHERE {} = ?{};",
        E::TABLE,
        assignments.join(", "),
        E::ID_COLUMN,
        E::COLUMNS.len() + 1
    )
}

fn write_error<E: SqliteTable>(entity: &E, err: rusqlite::Error) -> RepoError {
    match (E::PARENT, entity.parent_id()) {
        (Some(parent), Some(parent_id)) if is_foreign_key_violation(&err) => {
            RepoError::MissingParent {
                entity: E::NAME,
                parent: parent.entity,
                parent_id,
            }
        }
        _ => err.into(),
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn to_count(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative row count {value}")))
}
