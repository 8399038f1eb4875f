use axum::extract::State;

use crate::entity::about_content;
use crate::store::about::AboutSectionInput;

use super::{
    ApiErr, AppState,
    extract::{Json, Path},
    session::AdminUser,
    validation::validate_section_key,
};

pub async fn list_about_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<about_content::Model>>, ApiErr> {
    Ok(Json(state.store.list_about_content().await?))
}

pub async fn get_about_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<Option<about_content::Model>>, ApiErr> {
    Ok(Json(state.store.get_about_section(&section).await?))
}

/// Create or overwrite one section. Omitted fields keep their stored value.
pub async fn upsert_about_section(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(body): Json<AboutSectionInput>,
) -> Result<Json<about_content::Model>, ApiErr> {
    let section = validate_section_key(&section)?;

    let model = state.store.upsert_about_section(section, body).await?;
    tracing::info!(section, by = admin.id, "about section saved");
    Ok(Json(model))
}
