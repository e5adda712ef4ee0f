//! Table mappings for persisted entity types.
//!
//! # Responsibility
//! - Describe, per entity type, the backing table and its non-identity
//!   columns.
//! - Convert records to bind values and rows back to records.
//!
//! # Invariants
//! - Every mapped table has an `id INTEGER PRIMARY KEY` column.
//! - `COLUMNS` order matches `column_values()` order.
//! - A stored value of the wrong type decodes to `RepoError::InvalidData`.

use crate::model::book::Book;
use crate::model::member::Member;
use crate::model::returns::Return;
use crate::model::EntityId;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::{FromSql, Value};
use rusqlite::Row;

/// A record type persisted by the generic repository.
pub trait Entity: Sized {
    /// Human-readable entity name used in errors and log events.
    const NAME: &'static str;
    /// Backing table.
    const TABLE: &'static str;
    /// Non-identity columns, in bind order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<EntityId>;

    /// Returns this record bound to `id`.
    fn with_assigned_id(self, id: EntityId) -> Self;

    fn column_values(&self) -> Vec<Value>;

    /// Decodes a row selected as `id` followed by `COLUMNS`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

impl Entity for Member {
    const NAME: &'static str = "member";
    const TABLE: &'static str = "members";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn with_assigned_id(self, id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    fn column_values(&self) -> Vec<Value> {
        vec![Value::Text(self.name.clone())]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id = row.get("id")?;
        Ok(Self {
            id: Some(id),
            name: read_column(row, Self::TABLE, "name", id)?,
        })
    }
}

impl Entity for Book {
    const NAME: &'static str = "book";
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] = &["title"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn with_assigned_id(self, id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    fn column_values(&self) -> Vec<Value> {
        vec![Value::Text(self.title.clone())]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id = row.get("id")?;
        Ok(Self {
            id: Some(id),
            title: read_column(row, Self::TABLE, "title", id)?,
        })
    }
}

impl Entity for Return {
    const NAME: &'static str = "return";
    const TABLE: &'static str = "returns";
    const COLUMNS: &'static [&'static str] = &["member_id", "book_id"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn with_assigned_id(self, id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    fn column_values(&self) -> Vec<Value> {
        vec![Value::Integer(self.member_id), Value::Integer(self.book_id)]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id: EntityId = row.get("id")?;
        let member_id = read_column(row, Self::TABLE, "member_id", id)?;
        let book_id = read_column(row, Self::TABLE, "book_id", id)?;
        Ok(Self {
            id: Some(id),
            member_id,
            book_id,
        })
    }
}

fn read_column<T: FromSql>(
    row: &Row<'_>,
    table: &str,
    column: &str,
    id: EntityId,
) -> RepoResult<T> {
    match row.get::<_, T>(column) {
        Ok(value) => Ok(value),
        Err(
            rusqlite::Error::InvalidColumnType(_, _, stored)
            | rusqlite::Error::FromSqlConversionFailure(_, stored, _),
        ) => Err(RepoError::InvalidData(format!(
            "unexpected {stored} value in {table}.{column} for id {id}"
        ))),
        Err(rusqlite::Error::IntegralValueOutOfRange(_, value)) => Err(RepoError::InvalidData(
            format!("out-of-range value `{value}` in {table}.{column} for id {id}"),
        )),
        Err(err) => Err(err.into()),
    }
}
