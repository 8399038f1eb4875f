use axum::{
    extract::State,
    http::StatusCode,
};

use crate::entity::{project, project_image};
use crate::store::projects::{NewProject, NewProjectImage, ProjectChanges};

use super::{
    ApiErr, AppState,
    dto::{BulkDeleteResponse, DeleteResponse},
    extract::{Json, Path},
    session::AdminUser,
    validation::{validate_id, validate_optional, validate_required},
};

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<project::Model>>, ApiErr> {
    Ok(Json(state.store.list_projects().await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<project::Model>>, ApiErr> {
    Ok(Json(state.store.get_project(validate_id(id)?).await?))
}

pub async fn create_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewProject>,
) -> Result<(StatusCode, Json<project::Model>), ApiErr> {
    validate_required("title", &body.title)?;

    let model = state.store.create_project(body).await?;
    tracing::info!(id = model.id, by = admin.id, "project created");
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProjectChanges>,
) -> Result<Json<project::Model>, ApiErr> {
    validate_optional("title", body.title.as_deref())?;

    let model = state.store.update_project(validate_id(id)?, body).await?;
    tracing::info!(id, by = admin.id, "project updated");
    Ok(Json(model))
}

/// Removes the project together with its gallery.
pub async fn delete_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiErr> {
    let deleted = state.store.delete_project(validate_id(id)?).await?;
    tracing::info!(id, deleted, by = admin.id, "project delete");
    Ok(Json(DeleteResponse::from(deleted)))
}

// ---------- gallery ----------

pub async fn list_project_images(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<project_image::Model>>, ApiErr> {
    Ok(Json(
        state
            .store
            .list_project_images(validate_id(project_id)?)
            .await?,
    ))
}

pub async fn create_project_image(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(body): Json<NewProjectImage>,
) -> Result<(StatusCode, Json<project_image::Model>), ApiErr> {
    validate_required("imageUrl", &body.image_url)?;

    let model = state
        .store
        .create_project_image(validate_id(project_id)?, body)
        .await?;
    tracing::info!(id = model.id, project_id, by = admin.id, "project image added");
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn delete_project_image(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiErr> {
    let deleted = state.store.delete_project_image(validate_id(id)?).await?;
    tracing::info!(id, deleted, by = admin.id, "project image delete");
    Ok(Json(DeleteResponse::from(deleted)))
}

pub async fn delete_project_images(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<BulkDeleteResponse>, ApiErr> {
    let deleted = state
        .store
        .delete_project_images(validate_id(project_id)?)
        .await?;
    tracing::info!(project_id, deleted, by = admin.id, "project gallery cleared");
    Ok(Json(BulkDeleteResponse {
        success: true,
        deleted,
    }))
}
