//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ComposerDraft;

/// A stored composer record
///
/// `id`, `created_at` and `updated_at` are assigned by the record store and
/// are never taken from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composer {
    pub id: Uuid,
    pub name: String,
    pub born: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<i64>,
    pub era: String,
    pub bio: String,
    pub notable_works: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Composer {
    /// The client-settable part of this record
    pub fn draft(&self) -> ComposerDraft {
        ComposerDraft {
            name: self.name.clone(),
            born: self.born,
            death: self.death,
            era: self.era.clone(),
            bio: self.bio.clone(),
            notable_works: self.notable_works.clone(),
        }
    }
}
