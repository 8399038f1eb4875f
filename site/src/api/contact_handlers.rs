use axum::extract::State;

use crate::entity::contact_info;
use crate::store::contact::ContactChanges;

use super::{ApiErr, AppState, extract::Json, session::AdminUser};

pub async fn get_contact_info(
    State(state): State<AppState>,
) -> Result<Json<Option<contact_info::Model>>, ApiErr> {
    Ok(Json(state.store.get_contact_info().await?))
}

pub async fn update_contact_info(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<ContactChanges>,
) -> Result<Json<contact_info::Model>, ApiErr> {
    let model = state.store.update_contact_info(body).await?;
    tracing::info!(by = admin.id, "contact info updated");
    Ok(Json(model))
}
