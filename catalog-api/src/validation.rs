//! HTTP input validation
//!
//! Turns untyped query strings, path segments and JSON bodies into typed
//! values, or into a [`ValidationFailure`] listing every field that broke a
//! rule. Field rules come from `catalog_common::schema`.

use catalog_common::schema::{self, FieldIssue};
use catalog_common::ComposerDraft;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::pagination::Page;
use crate::store::{ListFilter, SortKey};

/// Which part of the request failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Query,
    Params,
    Body,
}

impl InputSource {
    /// Client-facing summary used as the `error` field of a 400 response
    pub fn message(self) -> &'static str {
        match self {
            InputSource::Query => "Invalid query parameters",
            InputSource::Params => "Invalid ID parameter",
            InputSource::Body => "Invalid request body",
        }
    }
}

/// Rejected input: where it came from and every violated rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub source: InputSource,
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn new(source: InputSource, issues: Vec<FieldIssue>) -> Self {
        Self { source, issues }
    }

    fn single(source: InputSource, field: &str, reason: impl Into<String>) -> Self {
        Self::new(source, vec![FieldIssue::new(field, reason)])
    }
}

/// Validated parameters of `GET /composers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Page,
    pub filter: ListFilter,
    pub sort: SortKey,
}

/// Validate list query parameters. Unknown parameters are ignored.
pub fn list_query(params: &HashMap<String, String>) -> Result<ListQuery, ValidationFailure> {
    let mut issues = Vec::new();
    let mut query = ListQuery::default();

    if let Some(raw) = params.get("offset") {
        match parse_count(raw) {
            Some(offset) => query.page.offset = offset,
            None => issues.push(FieldIssue::new("offset", "must be a non-negative integer")),
        }
    }
    if let Some(raw) = params.get("limit") {
        match parse_count(raw) {
            Some(limit) => query.page.limit = limit,
            None => issues.push(FieldIssue::new("limit", "must be a non-negative integer")),
        }
    }

    if let Some(name) = params.get("name") {
        match schema::SEARCH_FILTER.check("name", name) {
            Some(issue) => issues.push(issue),
            None => query.filter.name = Some(name.clone()),
        }
    }
    if let Some(era) = params.get("era") {
        match schema::SEARCH_FILTER.check("era", era) {
            Some(issue) => issues.push(issue),
            None => query.filter.era = Some(era.clone()),
        }
    }
    for (field, slot) in [("born", &mut query.filter.born), ("death", &mut query.filter.death)] {
        if let Some(raw) = params.get(field) {
            match raw.trim().parse::<i64>() {
                Ok(year) => *slot = Some(year),
                Err(_) => issues.push(FieldIssue::new(field, "must be an integer year")),
            }
        }
    }

    if let Some(raw) = params.get("sortBy") {
        match raw.parse::<SortKey>() {
            Ok(sort) => query.sort = sort,
            Err(reason) => issues.push(FieldIssue::new("sortBy", reason)),
        }
    }

    if issues.is_empty() {
        Ok(query)
    } else {
        Err(ValidationFailure::new(InputSource::Query, issues))
    }
}

/// Digits only; no sign, no whitespace
fn parse_count(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Validate the `:id` path segment
pub fn composer_id(raw: &str) -> Result<Uuid, ValidationFailure> {
    Uuid::parse_str(raw)
        .map_err(|_| ValidationFailure::single(InputSource::Params, "id", "must be a UUID"))
}

/// Validate a create/update body into a draft
///
/// Shape errors (missing field, wrong JSON type) are reported first; only a
/// well-shaped body is checked against the field constraints.
pub fn composer_body(body: &Value) -> Result<ComposerDraft, ValidationFailure> {
    let Some(object) = body.as_object() else {
        return Err(ValidationFailure::single(
            InputSource::Body,
            "body",
            "must be a JSON object",
        ));
    };

    let mut issues = Vec::new();
    let name = required_string(object, "name", &mut issues);
    let born = required_integer(object, "born", &mut issues);
    let death = optional_integer(object, "death", &mut issues);
    let era = required_string(object, "era", &mut issues);
    let bio = required_string(object, "bio", &mut issues);
    let notable_works = match object.get("notableWorks") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(value) => string_array(value, "notableWorks", &mut issues),
    };

    match (name, born, death, era, bio, notable_works) {
        (Some(name), Some(born), Some(death), Some(era), Some(bio), Some(notable_works))
            if issues.is_empty() =>
        {
            let draft = ComposerDraft {
                name,
                born,
                death,
                era,
                bio,
                notable_works,
            };
            let issues = draft.check();
            if issues.is_empty() {
                Ok(draft)
            } else {
                Err(ValidationFailure::new(InputSource::Body, issues))
            }
        }
        _ => Err(ValidationFailure::new(InputSource::Body, issues)),
    }
}

/// Validate the body of the append endpoint: a JSON array of titles
pub fn notable_works_body(body: &Value) -> Result<Vec<String>, ValidationFailure> {
    let mut issues = Vec::new();
    let Some(items) = string_array(body, "notableWorks", &mut issues) else {
        return Err(ValidationFailure::new(InputSource::Body, issues));
    };

    for (i, item) in items.iter().enumerate() {
        issues.extend(schema::APPENDED_WORK.check(&format!("notableWorks[{}]", i), item));
    }

    if issues.is_empty() {
        Ok(items)
    } else {
        Err(ValidationFailure::new(InputSource::Body, issues))
    }
}

fn required_string(object: &Map<String, Value>, field: &str, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, "is required"));
            None
        }
        Some(_) => {
            issues.push(FieldIssue::new(field, "must be a string"));
            None
        }
    }
}

fn required_integer(object: &Map<String, Value>, field: &str, issues: &mut Vec<FieldIssue>) -> Option<i64> {
    match object.get(field) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, "is required"));
            None
        }
        Some(value) => integer(value, field, issues),
    }
}

/// `Some(None)` when absent or null, `None` when present but not an integer
fn optional_integer(object: &Map<String, Value>, field: &str, issues: &mut Vec<FieldIssue>) -> Option<Option<i64>> {
    match object.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(value) => integer(value, field, issues).map(Some),
    }
}

fn integer(value: &Value, field: &str, issues: &mut Vec<FieldIssue>) -> Option<i64> {
    let parsed = value.as_i64();
    if parsed.is_none() {
        issues.push(FieldIssue::new(field, "must be an integer"));
    }
    parsed
}

fn string_array(value: &Value, field: &str, issues: &mut Vec<FieldIssue>) -> Option<Vec<String>> {
    let Some(array) = value.as_array() else {
        issues.push(FieldIssue::new(field, "must be an array of strings"));
        return None;
    };

    let mut items = Vec::with_capacity(array.len());
    let mut well_formed = true;
    for (i, item) in array.iter().enumerate() {
        match item.as_str() {
            Some(s) => items.push(s.to_string()),
            None => {
                issues.push(FieldIssue::new(format!("{}[{}]", field, i), "must be a string"));
                well_formed = false;
            }
        }
    }

    well_formed.then_some(items)
}
