use axum::{
    extract::State,
    http::StatusCode,
};

use crate::entity::service;
use crate::store::services::{NewService, ServiceChanges};

use super::{
    ApiErr, AppState,
    dto::DeleteResponse,
    extract::{Json, Path},
    session::AdminUser,
    validation::{validate_id, validate_optional, validate_required},
};

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<service::Model>>, ApiErr> {
    Ok(Json(state.store.list_services().await?))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<service::Model>>, ApiErr> {
    Ok(Json(state.store.get_service(validate_id(id)?).await?))
}

pub async fn create_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewService>,
) -> Result<(StatusCode, Json<service::Model>), ApiErr> {
    validate_required("title", &body.title)?;

    let model = state.store.create_service(body).await?;
    tracing::info!(id = model.id, by = admin.id, "service created");
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ServiceChanges>,
) -> Result<Json<service::Model>, ApiErr> {
    validate_optional("title", body.title.as_deref())?;

    let model = state.store.update_service(validate_id(id)?, body).await?;
    tracing::info!(id, by = admin.id, "service updated");
    Ok(Json(model))
}

pub async fn delete_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiErr> {
    let deleted = state.store.delete_service(validate_id(id)?).await?;
    tracing::info!(id, deleted, by = admin.id, "service delete");
    Ok(Json(DeleteResponse::from(deleted)))
}
