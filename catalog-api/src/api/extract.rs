//! Validating extractors
//!
//! Each extractor runs one validator from [`crate::validation`] and rejects
//! with [`ApiError`], so handlers only ever see well-formed input and
//! framework rejections never reach the client in their default shape.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use catalog_common::{ComposerDraft, FieldIssue};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{self, InputSource, ListQuery, ValidationFailure};

/// `:id` path segment, parsed as a composer id
#[derive(Debug, Clone, Copy)]
pub struct ComposerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ComposerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationFailure::new(
                    InputSource::Params,
                    vec![FieldIssue::new("id", rejection.body_text())],
                )
            })?;

        Ok(Self(validation::composer_id(&raw)?))
    }
}

/// Validated list query string
#[derive(Debug, Clone)]
pub struct ListParams(pub ListQuery);

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationFailure::new(
                    InputSource::Query,
                    vec![FieldIssue::new("query", rejection.body_text())],
                )
            })?;

        Ok(Self(validation::list_query(&params)?))
    }
}

/// Validated create/update body
#[derive(Debug, Clone)]
pub struct ComposerBody(pub ComposerDraft);

#[async_trait]
impl<S> FromRequest<S> for ComposerBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = json_body(req, state).await?;
        Ok(Self(validation::composer_body(&body)?))
    }
}

/// Validated body of the append-notable-works endpoint
#[derive(Debug, Clone)]
pub struct AppendedWorks(pub Vec<String>);

#[async_trait]
impl<S> FromRequest<S> for AppendedWorks
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = json_body(req, state).await?;
        Ok(Self(validation::notable_works_body(&body)?))
    }
}

/// Read the body as untyped JSON; malformed JSON or a missing content type
/// is a body validation failure
async fn json_body<S>(req: Request, state: &S) -> Result<Value, ApiError>
where
    S: Send + Sync,
{
    let Json(value) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|rejection| {
            ValidationFailure::new(
                InputSource::Body,
                vec![FieldIssue::new("body", rejection.body_text())],
            )
        })?;

    Ok(value)
}
