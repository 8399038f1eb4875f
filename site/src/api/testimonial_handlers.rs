use axum::{
    extract::State,
    http::StatusCode,
};

use crate::entity::testimonial;
use crate::store::testimonials::{NewTestimonial, TestimonialChanges};

use super::{
    ApiErr, AppState,
    dto::{DeleteResponse, PublishedRequest},
    extract::{Json, Path},
    session::AdminUser,
    validation::{validate_id, validate_optional, validate_rating, validate_required},
};

/// Public listing: published testimonials only.
pub async fn list_published_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<testimonial::Model>>, ApiErr> {
    Ok(Json(state.store.list_published_testimonials().await?))
}

pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<testimonial::Model>>, ApiErr> {
    Ok(Json(state.store.list_testimonials().await?))
}

pub async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<testimonial::Model>>, ApiErr> {
    Ok(Json(state.store.get_testimonial(validate_id(id)?).await?))
}

pub async fn create_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<testimonial::Model>), ApiErr> {
    validate_required("clientName", &body.client_name)?;
    validate_required("content", &body.content)?;
    validate_rating(body.rating)?;

    let model = state.store.create_testimonial(body).await?;
    tracing::info!(id = model.id, by = admin.id, "testimonial created");
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TestimonialChanges>,
) -> Result<Json<testimonial::Model>, ApiErr> {
    validate_optional("clientName", body.client_name.as_deref())?;
    validate_optional("content", body.content.as_deref())?;
    if let Some(rating) = body.rating {
        validate_rating(rating)?;
    }

    let model = state.store.update_testimonial(validate_id(id)?, body).await?;
    tracing::info!(id, by = admin.id, "testimonial updated");
    Ok(Json(model))
}

pub async fn set_testimonial_published(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<PublishedRequest>,
) -> Result<Json<testimonial::Model>, ApiErr> {
    let model = state
        .store
        .set_testimonial_published(validate_id(id)?, body.is_published)
        .await?;
    tracing::info!(id, published = body.is_published, by = admin.id, "testimonial visibility changed");
    Ok(Json(model))
}

pub async fn delete_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiErr> {
    let deleted = state.store.delete_testimonial(validate_id(id)?).await?;
    tracing::info!(id, deleted, by = admin.id, "testimonial delete");
    Ok(Json(DeleteResponse::from(deleted)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::api::test_support::*;
    use crate::entity::user::Role;

    #[tokio::test]
    async fn defaults_and_publish_toggle() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;

        let res = app
            .send(
                Method::POST,
                "/api/v1/testimonials",
                Some(&admin),
                Some(json!({"clientName": "Sophie", "content": "Travail impeccable"})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = body_json(res).await;
        assert_eq!(created["rating"], 5);
        assert_eq!(created["isPublished"], true);
        let id = created["id"].as_i64().unwrap();

        let res = app
            .send(
                Method::PUT,
                &format!("/api/v1/testimonials/{id}/published"),
                Some(&admin),
                Some(json!({"isPublished": false})),
            )
            .await;
        assert_eq!(body_json(res).await["isPublished"], false);

        let res = app.send(Method::GET, "/api/v1/testimonials", None, None).await;
        assert!(body_json(res).await.as_array().unwrap().is_empty());

        let res = app.send(Method::GET, "/api/v1/testimonials/all", None, None).await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rating_out_of_range_rejected() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .send(
                Method::POST,
                "/api/v1/testimonials",
                Some(&admin),
                Some(json!({"clientName": "Marc", "content": "Bien", "rating": 9})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mistyped_field_is_a_validation_error() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .send(
                Method::POST,
                "/api/v1/testimonials",
                Some(&admin),
                Some(json!({"clientName": "Marc", "content": "Bien", "rating": "five"})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["code"], "VALIDATION");
        assert!(body["error"].is_string());

        let res = app
            .send(
                Method::PUT,
                "/api/v1/testimonials/abc/published",
                Some(&admin),
                Some(json!({"isPublished": true})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn toggle_missing_is_not_found() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .send(
                Method::PUT,
                "/api/v1/testimonials/77/published",
                Some(&admin),
                Some(json!({"isPublished": true})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
