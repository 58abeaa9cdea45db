//! Field constraints for composer records
//!
//! This is the single definition of what a valid composer looks like. The
//! HTTP input validator and the record store both consult it, so the two
//! layers cannot drift apart.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive bounds on the character count of a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
}

impl TextRule {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check `value` against the bounds, reporting a violation against `field`
    pub fn check(&self, field: &str, value: &str) -> Option<FieldIssue> {
        let len = value.chars().count();
        if len < self.min {
            Some(FieldIssue::new(
                field,
                format!("must be at least {} characters", self.min),
            ))
        } else if len > self.max {
            Some(FieldIssue::new(
                field,
                format!("must be at most {} characters", self.max),
            ))
        } else {
            None
        }
    }
}

pub const NAME: TextRule = TextRule::new(2, 100);
pub const ERA: TextRule = TextRule::new(2, 100);
pub const BIO: TextRule = TextRule::new(10, 1000);
pub const NOTABLE_WORK: TextRule = TextRule::new(2, 100);

/// Items accepted by the append-notable-works operation.
///
/// Looser than [`NOTABLE_WORK`]: appended titles may be a single character.
pub const APPENDED_WORK: TextRule = TextRule::new(1, 100);

/// Name and era search filters on the list endpoint
pub const SEARCH_FILTER: TextRule = TextRule::new(0, 100);

/// Earliest accepted year for `born` and `death`
pub const MIN_YEAR: i64 = 0;

/// Latest accepted year for `born` and `death`
pub fn current_year() -> i64 {
    i64::from(Utc::now().year())
}

/// Check that `year` lies within `MIN_YEAR..=current_year()`
pub fn check_year(field: &str, year: i64) -> Option<FieldIssue> {
    let max = current_year();
    if year < MIN_YEAR {
        Some(FieldIssue::new(field, format!("must be at least {}", MIN_YEAR)))
    } else if year > max {
        Some(FieldIssue::new(field, format!("must be at most {}", max)))
    } else {
        None
    }
}

/// One violated constraint: which field, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Client-settable composer fields, as accepted by create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerDraft {
    pub name: String,
    pub born: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<i64>,
    pub era: String,
    pub bio: String,
    #[serde(default)]
    pub notable_works: Vec<String>,
}

impl ComposerDraft {
    /// Every constraint this draft violates. Empty means valid.
    pub fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        issues.extend(NAME.check("name", &self.name));
        issues.extend(check_year("born", self.born));
        if let Some(death) = self.death {
            issues.extend(check_year("death", death));
            if death < self.born {
                issues.push(FieldIssue::new("death", "must not be earlier than born"));
            }
        }
        issues.extend(ERA.check("era", &self.era));
        issues.extend(BIO.check("bio", &self.bio));
        for (i, work) in self.notable_works.iter().enumerate() {
            issues.extend(NOTABLE_WORK.check(&format!("notableWorks[{}]", i), work));
        }

        issues
    }
}
