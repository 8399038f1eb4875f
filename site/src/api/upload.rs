use axum::extract::{Multipart, State, multipart::MultipartRejection};
use uuid::Uuid;

use super::{ApiErr, AppState, dto::UploadResponse, extract::Json, session::AdminUser};

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg"];

/// Public URL prefix under which the upload directory is served.
const PUBLIC_PREFIX: &str = "/uploads";

fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Store the multipart field `file` under a random name, keeping its extension.
pub async fn upload_file(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiErr> {
    let mut multipart = multipart?;
    let max_bytes = state.config.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiErr::validation(format!("Invalid multipart data: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let ext = allowed_extension(&original_name).ok_or_else(|| {
            ApiErr::validation(format!(
                "Unsupported file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiErr::validation(format!("Failed to read file data: {e}")))?;
        upload = Some((ext, bytes));
        break;
    }
    let (ext, bytes) = upload.ok_or_else(|| ApiErr::validation("No file provided"))?;

    if bytes.is_empty() {
        return Err(ApiErr::validation("Empty file"));
    }
    if bytes.len() > max_bytes {
        return Err(ApiErr::validation(format!(
            "File too large. Maximum size is {max_bytes} bytes"
        )));
    }

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(ApiErr::internal)?;

    let filename = format!("{}.{ext}", Uuid::new_v4());
    tokio::fs::write(upload_dir.join(&filename), &bytes)
        .await
        .map_err(ApiErr::internal)?;

    tracing::info!(file = %filename, size = bytes.len(), by = admin.id, "file uploaded");
    Ok(Json(UploadResponse {
        success: true,
        url: format!("{PUBLIC_PREFIX}/{filename}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::api::test_support::*;
    use crate::entity::user::Role;

    const BOUNDARY: &str = "X-SITE-TEST-BOUNDARY";

    fn multipart_request(cookie: Option<&str>, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[test]
    fn extension_whitelist() {
        assert_eq!(allowed_extension("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("logo.svg").as_deref(), Some("svg"));
        assert_eq!(allowed_extension("script.sh"), None);
        assert_eq!(allowed_extension("noext"), None);
    }

    #[tokio::test]
    async fn admin_upload_is_stored_and_served() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;

        let res = app
            .router
            .clone()
            .oneshot(multipart_request(Some(&admin), "file", "chambre.png", b"\x89PNG fake"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        let url = body["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/") && url.ends_with(".png"));

        let stored = app
            .state
            .config
            .upload_dir
            .join(url.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"\x89PNG fake");

        let res = app.send(Method::GET, &url, None, None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let _ = tokio::fs::remove_dir_all(&app.state.config.upload_dir).await;
    }

    #[tokio::test]
    async fn upload_requires_admin() {
        let app = TestApp::new().await;
        let res = app
            .router
            .clone()
            .oneshot(multipart_request(None, "file", "a.png", b"data"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn disallowed_type_rejected() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .router
            .clone()
            .oneshot(multipart_request(Some(&admin), "file", "run.exe", b"MZ"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_validation_error() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .send(Method::POST, "/api/upload", Some(&admin), Some(serde_json::json!({"file": "x"})))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn missing_file_field_rejected() {
        let app = TestApp::new().await;
        let admin = app.session_for("admin@example.be", Role::Admin).await;
        let res = app
            .router
            .clone()
            .oneshot(multipart_request(Some(&admin), "avatar", "a.png", b"data"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "No file provided");
    }
}
