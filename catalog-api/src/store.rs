//! Record store adapter
//!
//! Every composer read and write goes through [`ComposerStore`]. Failures
//! come back as a closed [`StoreError`] so callers never inspect raw
//! database errors.

use catalog_common::schema::{self, FieldIssue};
use catalog_common::{Composer, ComposerDraft};
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Store-layer failure kinds
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the requested id
    #[error("Composer not found")]
    NotFound,

    /// Uniqueness constraint violated
    #[error("Composer already exists ({field} = {value})")]
    Conflict { field: String, value: String },

    /// Record failed the shared field constraints
    #[error("Composer failed validation: {0:?}")]
    Validation(Vec<FieldIssue>),

    /// Anything else the backend reported
    #[error("Store error {code}: {message}")]
    Backend { code: String, message: String },
}

impl StoreError {
    /// Classify a backend error. `name` is the value written, reported back
    /// on a uniqueness conflict.
    fn classify(err: sqlx::Error, name: Option<&str>) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict {
                field: "name".to_string(),
                value: name.map(str::to_string).unwrap_or_else(|| db_err.message().to_string()),
            },
            sqlx::Error::Database(db_err) => StoreError::Backend {
                code: db_err
                    .code()
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|| "DATABASE".to_string()),
                message: db_err.message().to_string(),
            },
            other => StoreError::Backend {
                code: "STORE_UNAVAILABLE".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::classify(err, None)
    }
}

/// Field a composer list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Born,
    Death,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Born => "born",
            SortField::Death => "death",
        }
    }
}

/// Ordering for list results, written `field` (ascending) or `-field` (descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortKey {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            descending: false,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "name" => SortField::Name,
            "born" => SortField::Born,
            "death" => SortField::Death,
            _ => {
                return Err(format!(
                    "must be one of born, -born, name, -name, death, -death (got {:?})",
                    s
                ))
            }
        };
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-")?;
        }
        write!(f, "{}", self.field.column())
    }
}

/// Filters for [`ComposerStore::list`]. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring of the composer name
    pub name: Option<String>,
    /// Case-insensitive substring of the era
    pub era: Option<String>,
    /// Exact birth year
    pub born: Option<i64>,
    /// Exact death year
    pub death: Option<i64>,
}

#[derive(Debug, FromRow)]
struct ComposerRow {
    id: String,
    name: String,
    born: i64,
    death: Option<i64>,
    era: String,
    bio: String,
    notable_works: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ComposerRow> for Composer {
    type Error = StoreError;

    fn try_from(row: ComposerRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id).map_err(|e| StoreError::Backend {
            code: "CORRUPT_RECORD".to_string(),
            message: format!("stored id {:?} is not a UUID: {}", row.id, e),
        })?;

        Ok(Composer {
            id,
            name: row.name,
            born: row.born,
            death: row.death,
            era: row.era,
            bio: row.bio,
            notable_works: row.notable_works.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Reject drafts that violate the shared constraints before they reach the table
fn ensure_valid(draft: &ComposerDraft) -> Result<(), StoreError> {
    let issues = draft.check();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(issues))
    }
}

/// Lowercased search text, or `None` when the filter is absent or empty
fn folded_needle(filter: Option<&str>) -> Option<String> {
    filter.filter(|s| !s.is_empty()).map(str::to_lowercase)
}

/// Unicode-aware case-insensitive substring test
fn contains_folded(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(needle),
        None => true,
    }
}

/// Handle to the composer collection
#[derive(Clone)]
pub struct ComposerStore {
    pool: SqlitePool,
}

impl ComposerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All composers matching `filter`, ordered by `sort`.
    ///
    /// Returns the full matching set; callers slice it for pagination.
    ///
    /// Year filters run in SQL. Name and era matching runs here, since
    /// SQLite's `lower()` folds ASCII only.
    pub async fn list(&self, filter: &ListFilter, sort: SortKey) -> Result<Vec<Composer>, StoreError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM composers WHERE 1 = 1");

        if let Some(born) = filter.born {
            query.push(" AND born = ").push_bind(born);
        }
        if let Some(death) = filter.death {
            query.push(" AND death = ").push_bind(death);
        }

        // Column names come from SortField, never from client text
        query
            .push(" ORDER BY ")
            .push(sort.field.column())
            .push(if sort.descending { " DESC" } else { " ASC" })
            .push(", id ASC");

        let rows: Vec<ComposerRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let name = folded_needle(filter.name.as_deref());
        let era = folded_needle(filter.era.as_deref());
        let matching: Vec<ComposerRow> = rows
            .into_iter()
            .filter(|row| contains_folded(&row.name, name.as_deref()))
            .filter(|row| contains_folded(&row.era, era.as_deref()))
            .collect();
        debug!(count = matching.len(), sort = %sort, "Listed composers");

        matching.into_iter().map(Composer::try_from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Composer, StoreError> {
        let row: Option<ComposerRow> = sqlx::query_as("SELECT * FROM composers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    /// Insert a new composer. The store assigns the id and both timestamps.
    pub async fn create(&self, draft: &ComposerDraft) -> Result<Composer, StoreError> {
        ensure_valid(draft)?;

        let now = Utc::now();
        let row: ComposerRow = sqlx::query_as(
            r#"
            INSERT INTO composers (id, name, born, death, era, bio, notable_works, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&draft.name)
        .bind(draft.born)
        .bind(draft.death)
        .bind(&draft.era)
        .bind(&draft.bio)
        .bind(Json(draft.notable_works.clone()))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::classify(e, Some(&draft.name)))?;

        row.try_into()
    }

    /// Replace every client-settable field of an existing composer
    pub async fn update_by_id(&self, id: Uuid, draft: &ComposerDraft) -> Result<Composer, StoreError> {
        ensure_valid(draft)?;

        let row: Option<ComposerRow> = sqlx::query_as(
            r#"
            UPDATE composers
            SET name = ?, born = ?, death = ?, era = ?, bio = ?, notable_works = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(draft.born)
        .bind(draft.death)
        .bind(&draft.era)
        .bind(&draft.bio)
        .bind(Json(draft.notable_works.clone()))
        .bind(Utc::now())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::classify(e, Some(&draft.name)))?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    /// Remove a composer, returning the record as it was before deletion
    pub async fn delete_by_id(&self, id: Uuid) -> Result<Composer, StoreError> {
        let row: Option<ComposerRow> = sqlx::query_as("DELETE FROM composers WHERE id = ? RETURNING *")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    /// Append `items` to the end of a composer's notable works, in order.
    ///
    /// Runs as one transaction whose first statement is a write, so
    /// concurrent appends to the same record serialize instead of
    /// overwriting each other.
    pub async fn append_notable_works(&self, id: Uuid, items: &[String]) -> Result<Composer, StoreError> {
        let issues: Vec<FieldIssue> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| schema::APPENDED_WORK.check(&format!("notableWorks[{}]", i), item))
            .collect();
        if !issues.is_empty() {
            return Err(StoreError::Validation(issues));
        }

        let id = id.to_string();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE composers SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        for item in items {
            sqlx::query("UPDATE composers SET notable_works = json_insert(notable_works, '$[#]', ?) WHERE id = ?")
                .bind(item)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
        }

        let row: ComposerRow = sqlx::query_as("SELECT * FROM composers WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(composer_id = %id, appended = items.len(), "Appended notable works");

        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_folded_handles_non_ascii() {
        let needle = folded_needle(Some("DVOŘÁK"));
        assert!(contains_folded("Antonín Dvořák", needle.as_deref()));
        assert!(!contains_folded("Bedřich Smetana", needle.as_deref()));
        assert_eq!(folded_needle(Some("")), None);
        assert!(contains_folded("anything", None));
    }

    #[test]
    fn test_sort_key_parses_all_variants() {
        let cases = [
            ("name", SortField::Name, false),
            ("-name", SortField::Name, true),
            ("born", SortField::Born, false),
            ("-born", SortField::Born, true),
            ("death", SortField::Death, false),
            ("-death", SortField::Death, true),
        ];
        for (text, field, descending) in cases {
            let key: SortKey = text.parse().unwrap();
            assert_eq!(key, SortKey { field, descending });
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn test_sort_key_rejects_unknown_fields() {
        assert!("era".parse::<SortKey>().is_err());
        assert!("--born".parse::<SortKey>().is_err());
        assert!("".parse::<SortKey>().is_err());
        assert!("name; DROP TABLE composers".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_default_sort_is_name_ascending() {
        assert_eq!(SortKey::default().to_string(), "name");
    }

    #[test]
    fn test_row_not_found_classifies_as_not_found() {
        assert_eq!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound);
    }

    #[test]
    fn test_pool_timeout_classifies_as_backend() {
        match StoreError::from(sqlx::Error::PoolTimedOut) {
            StoreError::Backend { code, .. } => assert_eq!(code, "STORE_UNAVAILABLE"),
            other => panic!("Expected Backend, got {:?}", other),
        }
    }
}
