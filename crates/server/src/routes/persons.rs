use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::{Person, PersonInput, PersonPage};
use serde::Deserialize;
use service::errors::ServiceError;
use service::pagination::Pagination;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::metrics::record_operation;
use crate::routes::AppState;

/// Raw listing parameters. Values that do not parse fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Zero-based page index (default 0)
    pub page: Option<String>,
    /// Records per page, clamped to 1..=100 (default 10)
    pub size: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: parse_or(self.page.as_deref(), defaults.page),
            size: parse_or(self.size.as_deref(), defaults.size),
        }
    }
}

fn parse_or(raw: Option<&str>, fallback: u64) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(fallback)
}

fn outcome<T>(res: &Result<T, ServiceError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(ServiceError::NotFound(_)) => "not_found",
        Err(ServiceError::DuplicateKey(_)) => "duplicate_key",
    }
}

#[utoipa::path(
    post, path = "/persons", tag = "persons",
    request_body = crate::openapi::PersonInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PersonDoc),
        (status = 400, description = "Malformed body", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Duplicate id", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ValidationErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), JsonApiError> {
    let Json(input) = payload?;
    let person = input.into_person()?;
    let res = state.persons.create(person).await;
    record_operation("create", outcome(&res));
    let created = res?;
    info!(id = %created.id, name = %created.name, "person_created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/persons/{id}", tag = "persons",
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PersonDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Invalid id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Person>, JsonApiError> {
    let Path(id) = id?;
    let res = state.persons.get(id).await;
    record_operation("get", outcome(&res));
    Ok(Json(res?))
}

#[utoipa::path(
    get, path = "/persons", tag = "persons",
    params(ListQuery),
    responses((status = 200, description = "List OK", body = crate::openapi::PersonPageDoc))
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<PersonPage>, JsonApiError> {
    // a query string that does not deserialize (e.g. a repeated key) is
    // treated like one with no parameters
    let q = query.map(|Query(q)| q).unwrap_or_else(|rejection| {
        debug!(error = %rejection.body_text(), "ignoring unusable list query");
        ListQuery::default()
    });
    let (page, size) = q.pagination().normalize();
    let res = state.persons.list(page, size).await;
    record_operation("list", outcome(&res));
    let page = res?;
    info!(count = page.persons.len(), total = page.meta.total_records, "list persons");
    Ok(Json(page))
}

#[utoipa::path(
    put, path = "/persons/{id}", tag = "persons",
    params(("id" = Uuid, Path, description = "Person ID")),
    request_body = crate::openapi::PersonInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PersonDoc),
        (status = 400, description = "Malformed body", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error or invalid id", body = crate::openapi::ValidationErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<Person>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let person = input.into_person_with_id(id)?;
    let res = state.persons.update(person).await;
    record_operation("update", outcome(&res));
    let updated = res?;
    info!(id = %updated.id, "person_updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/persons/{id}", tag = "persons",
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Invalid id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    let res = state.persons.delete(id).await;
    record_operation("delete", outcome(&res));
    res?;
    info!(%id, "person_deleted");
    Ok(StatusCode::NO_CONTENT)
}
