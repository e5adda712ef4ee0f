//! Facade contract and its SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete/exists/count over one entity table.
//! - Assign identities on insert and overwrite records that already carry one.
//!
//! # Invariants
//! - Identities come only from the store; a caller-supplied id that no longer
//!   exists is never re-inserted.
//! - `find_all` and `find_all_by_id` return rows in ascending id order.
//! - `delete_by_id` on an absent id is a no-op, not an error.
//! - Batch writes (`save_all`, `delete_all_by_id`) are all-or-nothing, also
//!   when the connection already has an open transaction.

use crate::model::EntityId;
use crate::repo::entity::Entity;
use crate::repo::error::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::iter;
use std::marker::PhantomData;
use std::time::Instant;

const BATCH_SAVEPOINT: &str = "perpus_batch";

/// Uniform CRUD facade over one entity type.
pub trait Repository<E: Entity> {
    /// Inserts `entity` when it has no id, otherwise overwrites the record
    /// with that id. A record whose id is no longer stored is inserted under
    /// a fresh id. Returns the stored entity with its id populated.
    fn save(&self, entity: E) -> RepoResult<E>;

    /// Saves every entity in order inside one savepoint.
    fn save_all(&self, entities: Vec<E>) -> RepoResult<Vec<E>>;

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;

    /// Like `find_by_id`, but absence is a `RepoError::NotFound`.
    fn get_by_id(&self, id: EntityId) -> RepoResult<E> {
        self.find_by_id(id)?
            .ok_or(RepoError::NotFound { entity: E::NAME, id })
    }

    /// Returns a snapshot of every stored entity.
    fn find_all(&self) -> RepoResult<Vec<E>>;

    /// Returns the stored entities among `ids`; unknown ids are skipped.
    fn find_all_by_id(&self, ids: &[EntityId]) -> RepoResult<Vec<E>>;

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool>;

    fn count(&self) -> RepoResult<u64>;

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;

    /// Deletes the stored copy of `entity`. Unsaved entities are ignored.
    fn delete(&self, entity: &E) -> RepoResult<()> {
        match entity.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }

    fn delete_all_by_id(&self, ids: &[EntityId]) -> RepoResult<()>;

    /// Removes every record of this type and returns how many were removed.
    fn delete_all(&self) -> RepoResult<u64>;
}

/// SQLite-backed facade for entity type `E`.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    sql: Statements,
    _entity: PhantomData<fn() -> E>,
}

struct Statements {
    insert: String,
    update: String,
    select_by_id: String,
    select_all: String,
    exists: String,
    count: String,
    delete_by_id: String,
    delete_all: String,
}

impl Statements {
    fn for_entity<E: Entity>() -> Self {
        let table = E::TABLE;
        let columns = E::COLUMNS.join(", ");
        let placeholders = placeholder_list(E::COLUMNS.len());
        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_placeholder = E::COLUMNS.len() + 1;
        let select = format!("SELECT id, {columns} FROM {table}");

        Self {
            insert: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders});"),
            update: format!("UPDATE {table} SET {assignments} WHERE id = ?{id_placeholder};"),
            select_by_id: format!("{select} WHERE id = ?1;"),
            select_all: format!("{select} ORDER BY id ASC;"),
            exists: format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            count: format!("SELECT COUNT(*) FROM {table};"),
            delete_by_id: format!("DELETE FROM {table} WHERE id = ?1;"),
            delete_all: format!("DELETE FROM {table};"),
        }
    }
}

impl<'conn, E: Entity> SqliteRepository<'conn, E> {
    /// Constructs a facade from a migrated store connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   does not carry the schema for `E`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, E::TABLE, E::COLUMNS)?;
        Ok(Self {
            conn,
            sql: Statements::for_entity::<E>(),
            _entity: PhantomData,
        })
    }

    fn save_one(&self, entity: E) -> RepoResult<E> {
        if let Some(id) = entity.id() {
            let values = entity
                .column_values()
                .into_iter()
                .chain(iter::once(Value::Integer(id)));
            let changed = self
                .conn
                .prepare_cached(&self.sql.update)?
                .execute(params_from_iter(values))?;
            if changed > 0 {
                return Ok(entity);
            }
            debug!(
                "event=repo_save module=repo entity={} mode=reinsert stale_id={id}",
                E::NAME
            );
        }

        self.conn
            .prepare_cached(&self.sql.insert)?
            .execute(params_from_iter(entity.column_values()))?;
        Ok(entity.with_assigned_id(self.conn.last_insert_rowid()))
    }

    fn find_one(&self, id: EntityId) -> RepoResult<Option<E>> {
        let mut stmt = self.conn.prepare_cached(&self.sql.select_by_id)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_one(&self, id: EntityId) -> RepoResult<usize> {
        let removed = self
            .conn
            .prepare_cached(&self.sql.delete_by_id)?
            .execute([id])?;
        Ok(removed)
    }
}

impl<E: Entity> Repository<E> for SqliteRepository<'_, E> {
    fn save(&self, entity: E) -> RepoResult<E> {
        let mode = if entity.id().is_some() { "update" } else { "insert" };
        observe::<E, _>("save", || {
            let saved = self.save_one(entity)?;
            debug!(
                "event=repo_save module=repo entity={} mode={mode} id={}",
                E::NAME,
                saved.id().unwrap_or_default()
            );
            Ok(saved)
        })
    }

    fn save_all(&self, entities: Vec<E>) -> RepoResult<Vec<E>> {
        observe::<E, _>("save_all", || {
            in_savepoint(self.conn, || {
                entities
                    .into_iter()
                    .map(|entity| self.save_one(entity))
                    .collect()
            })
        })
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        observe::<E, _>("find_by_id", || self.find_one(id))
    }

    fn find_all(&self) -> RepoResult<Vec<E>> {
        observe::<E, _>("find_all", || {
            let mut stmt = self.conn.prepare_cached(&self.sql.select_all)?;
            let mut rows = stmt.query([])?;
            let mut entities = Vec::new();
            while let Some(row) = rows.next()? {
                entities.push(E::from_row(row)?);
            }
            Ok(entities)
        })
    }

    fn find_all_by_id(&self, ids: &[EntityId]) -> RepoResult<Vec<E>> {
        observe::<E, _>("find_all_by_id", || {
            let unique: BTreeSet<EntityId> = ids.iter().copied().collect();
            in_savepoint(self.conn, || {
                let mut entities = Vec::with_capacity(unique.len());
                for id in unique {
                    if let Some(entity) = self.find_one(id)? {
                        entities.push(entity);
                    }
                }
                Ok(entities)
            })
        })
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        observe::<E, _>("exists_by_id", || {
            let exists: i64 = self
                .conn
                .prepare_cached(&self.sql.exists)?
                .query_row([id], |row| row.get(0))?;
            Ok(exists == 1)
        })
    }

    fn count(&self) -> RepoResult<u64> {
        observe::<E, _>("count", || {
            let count: i64 = self
                .conn
                .prepare_cached(&self.sql.count)?
                .query_row([], |row| row.get(0))?;
            u64::try_from(count).map_err(|_| {
                RepoError::InvalidData(format!("negative row count `{count}` for {}", E::TABLE))
            })
        })
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        observe::<E, _>("delete_by_id", || {
            let removed = self.delete_one(id)?;
            debug!(
                "event=repo_delete module=repo entity={} id={id} removed={removed}",
                E::NAME
            );
            Ok(())
        })
    }

    fn delete_all_by_id(&self, ids: &[EntityId]) -> RepoResult<()> {
        observe::<E, _>("delete_all_by_id", || {
            in_savepoint(self.conn, || {
                for id in ids {
                    self.delete_one(*id)?;
                }
                Ok(())
            })
        })
    }

    fn delete_all(&self) -> RepoResult<u64> {
        observe::<E, _>("delete_all", || {
            let removed = self.conn.execute(&self.sql.delete_all, [])?;
            Ok(removed as u64)
        })
    }
}

fn placeholder_list(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs `work` inside a named savepoint, which nests inside a caller's open
/// transaction and starts one otherwise. Any error rolls the savepoint back.
fn in_savepoint<T>(conn: &Connection, work: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
    conn.execute_batch(&format!("SAVEPOINT {BATCH_SAVEPOINT};"))?;
    match work() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {BATCH_SAVEPOINT};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO {BATCH_SAVEPOINT}; RELEASE {BATCH_SAVEPOINT};"
            )) {
                warn!("event=repo_savepoint module=repo status=error op=rollback error={rollback_err}");
            }
            Err(err)
        }
    }
}

/// Runs one facade operation and emits a `repo_op` event with its outcome.
fn observe<E: Entity, T>(op: &'static str, run: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
    let started_at = Instant::now();
    let result = run();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!(
            "event=repo_op module=repo entity={} op={op} status=ok duration_ms={duration_ms}",
            E::NAME
        ),
        Err(err) => warn!(
            "event=repo_op module=repo entity={} op={op} status=error duration_ms={duration_ms} error={err}",
            E::NAME
        ),
    }
    result
}

fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &'static [&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in iter::once(&"id").chain(columns) {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get("name")?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
