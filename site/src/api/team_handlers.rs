use axum::{
    extract::State,
    http::StatusCode,
};

use crate::entity::team_member;
use crate::store::team::{NewTeamMember, TeamMemberChanges};

use super::{
    ApiErr, AppState,
    dto::DeleteResponse,
    extract::{Json, Path},
    session::AdminUser,
    validation::{validate_id, validate_optional, validate_required},
};

pub async fn list_team_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<team_member::Model>>, ApiErr> {
    Ok(Json(state.store.list_team_members().await?))
}

pub async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<team_member::Model>>, ApiErr> {
    Ok(Json(state.store.get_team_member(validate_id(id)?).await?))
}

pub async fn create_team_member(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewTeamMember>,
) -> Result<(StatusCode, Json<team_member::Model>), ApiErr> {
    validate_required("name", &body.name)?;

    let model = state.store.create_team_member(body).await?;
    tracing::info!(id = model.id, by = admin.id, "team member created");
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update_team_member(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TeamMemberChanges>,
) -> Result<Json<team_member::Model>, ApiErr> {
    validate_optional("name", body.name.as_deref())?;

    let model = state.store.update_team_member(validate_id(id)?, body).await?;
    tracing::info!(id, by = admin.id, "team member updated");
    Ok(Json(model))
}

pub async fn delete_team_member(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiErr> {
    let deleted = state.store.delete_team_member(validate_id(id)?).await?;
    tracing::info!(id, deleted, by = admin.id, "team member delete");
    Ok(Json(DeleteResponse::from(deleted)))
}
