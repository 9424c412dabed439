use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ::duckdb::{params, ToSql};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::info;
use uuid::Uuid;

use crate::{finalize_transaction, UserId, Warehouse, WarehouseError};

const MAX_NOTE_LEN: usize = 2_000;

/// What a scrap points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Indicator,
}

impl ContentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Indicator => "indicator",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = WarehouseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(Self::News),
            "indicator" => Ok(Self::Indicator),
            other => Err(WarehouseError::InvalidRecord(format!(
                "unknown content type '{other}', expected news or indicator"
            ))),
        }
    }
}

/// A saved bookmark owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scrap {
    pub id: Uuid,
    pub user_id: UserId,
    pub content_type: ContentType,
    pub content_id: String,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert payload; the store assigns id, owner and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScrap {
    pub content_type: ContentType,
    pub content_id: String,
    pub notes: Option<String>,
}

impl NewScrap {
    pub fn new(
        content_type: ContentType,
        content_id: impl Into<String>,
    ) -> Result<Self, WarehouseError> {
        let content_id = content_id.into().trim().to_owned();
        if content_id.is_empty() {
            return Err(WarehouseError::InvalidRecord(String::from(
                "content id cannot be empty",
            )));
        }
        Ok(Self {
            content_type,
            content_id,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Result<Self, WarehouseError> {
        let notes = notes.into();
        if notes.chars().count() > MAX_NOTE_LEN {
            return Err(WarehouseError::InvalidRecord(format!(
                "note exceeds {MAX_NOTE_LEN} characters"
            )));
        }
        self.notes = Some(notes).filter(|n| !n.trim().is_empty());
        Ok(self)
    }
}

/// Row-store contract for scraps. Every operation is scoped to `user`.
pub trait ScrapStore {
    /// The user's scraps, newest first.
    fn list_scraps(&self, user: &UserId) -> Result<Vec<Scrap>, WarehouseError>;

    fn insert_scrap(&self, user: &UserId, scrap: NewScrap) -> Result<Scrap, WarehouseError>;

    /// Delete one scrap. Returns `false` when no scrap with that id belongs to `user`.
    fn delete_scrap(&self, user: &UserId, id: Uuid) -> Result<bool, WarehouseError>;
}

impl ScrapStore for Warehouse {
    fn list_scraps(&self, user: &UserId) -> Result<Vec<Scrap>, WarehouseError> {
        let connection = self.connection();
        let mut statement = connection.prepare(
            "SELECT id, content_type, content_id, notes, created_at FROM user_scraps \
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = statement
            .query_map(params![user.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, content_type, content_id, notes, created_at)| {
                Ok(Scrap {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| WarehouseError::InvalidRecord(format!("scrap id '{id}': {e}")))?,
                    user_id: user.clone(),
                    content_type: content_type.parse()?,
                    content_id,
                    notes,
                    created_at: OffsetDateTime::parse(&created_at, &Rfc3339).map_err(|e| {
                        WarehouseError::InvalidRecord(format!("created_at '{created_at}': {e}"))
                    })?,
                })
            })
            .collect()
    }

    fn insert_scrap(&self, user: &UserId, scrap: NewScrap) -> Result<Scrap, WarehouseError> {
        self.insert_scrap_at(user, scrap, OffsetDateTime::now_utc())
    }

    fn delete_scrap(&self, user: &UserId, id: Uuid) -> Result<bool, WarehouseError> {
        let connection = self.connection();
        let deleted = connection.execute(
            "DELETE FROM user_scraps WHERE id = ? AND user_id = ?",
            params![id.to_string(), user.as_str()],
        )?;
        info!(user = %user, %id, deleted, "scrap delete");
        Ok(deleted > 0)
    }
}

impl Warehouse {
    /// Insert with an explicit creation time.
    pub fn insert_scrap_at(
        &self,
        user: &UserId,
        scrap: NewScrap,
        created_at: OffsetDateTime,
    ) -> Result<Scrap, WarehouseError> {
        let created_at = truncate_to_micros(created_at.to_offset(UtcOffset::UTC));
        let record = Scrap {
            id: Uuid::new_v4(),
            user_id: user.clone(),
            content_type: scrap.content_type,
            content_id: scrap.content_id,
            notes: scrap.notes,
            created_at,
        };

        let connection = self.connection();
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), WarehouseError> {
            let id = record.id.to_string();
            let user_id = record.user_id.as_str();
            let content_type = record.content_type.as_str();
            let created_at = format_created_at(record.created_at);
            let params: [&dyn ToSql; 6] = [
                &id,
                &user_id,
                &content_type,
                &record.content_id,
                &record.notes,
                &created_at,
            ];
            connection.execute(
                "INSERT INTO user_scraps \
                 (id, user_id, content_type, content_id, notes, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params.as_slice(),
            )?;
            Ok(())
        })();
        finalize_transaction(&connection, result)?;

        info!(user = %user, id = %record.id, content_type = %record.content_type, "scrap saved");
        Ok(record)
    }
}

/// Fixed-width UTC text so lexical order is chronological order.
fn format_created_at(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}Z",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.microsecond()
    )
}

fn truncate_to_micros(at: OffsetDateTime) -> OffsetDateTime {
    at.replace_nanosecond(at.microsecond() * 1_000).unwrap_or(at)
}
