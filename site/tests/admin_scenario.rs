//! End-to-end flow through the public router: sign in over HTTP, then drive
//! the content API with and without the admin role.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use site::api::{AppService, AppState, app_service};
use site::config::Config;
use site::entity::user::Role;
use site::store::Store;

async fn setup() -> (AppState, AppService) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-secret".to_string()),
        _ => None,
    });
    let state = AppState::new(Store::new(db), config);

    state
        .auth
        .create_user("admin@rommelaere-renov.com", "admin-pass", None, Role::Admin)
        .await
        .unwrap();
    state
        .auth
        .create_user("client@example.be", "client-pass", None, Role::User)
        .await
        .unwrap();

    let router = app_service(state.clone());
    (state, router)
}

async fn call(router: &AppService, method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in and turn the returned `Set-Cookie` into a `Cookie` header value.
async fn login(router: &AppService, email: &str, password: &str) -> String {
    let res = call(
        router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login failed for {email}");
    res.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn admin_manages_services_and_client_cannot() {
    let (state, router) = setup().await;
    let admin = login(&router, "admin@rommelaere-renov.com", "admin-pass").await;
    let client = login(&router, "client@example.be", "client-pass").await;

    // Admin creates two services; the lower order lists first.
    for (title, order) in [("Plafonnage", 3), ("Gyproc et Cloisons", 1)] {
        let res = call(
            &router,
            Method::POST,
            "/api/v1/services",
            Some(&admin),
            Some(json!({ "title": title, "order": order })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = call(&router, Method::GET, "/api/v1/services", None, None).await;
    let services = json_body(res).await;
    assert_eq!(services[0]["title"], "Gyproc et Cloisons");
    assert_eq!(services[0]["order"], 1);
    let gyproc_id = services[0]["id"].as_i64().unwrap();

    // A signed-in non-admin is refused and nothing changes.
    let res = call(
        &router,
        Method::DELETE,
        &format!("/api/v1/services/{gyproc_id}"),
        Some(&client),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await["code"], "FORBIDDEN");
    assert_eq!(state.store.list_services().await.unwrap().len(), 2);

    // Anonymous callers are unauthenticated.
    let res = call(&router, Method::DELETE, &format!("/api/v1/services/{gyproc_id}"), None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The admin can delete it.
    let res = call(
        &router,
        Method::DELETE,
        &format!("/api/v1/services/{gyproc_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["deleted"], true);

    let remaining = state.store.list_services().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Plafonnage");
}

#[tokio::test]
async fn session_survives_until_logout_clears_it() {
    let (_state, router) = setup().await;
    let admin = login(&router, "admin@rommelaere-renov.com", "admin-pass").await;

    let res = call(&router, Method::GET, "/api/auth/me", Some(&admin), None).await;
    assert_eq!(json_body(res).await["role"], "admin");

    let res = call(&router, Method::POST, "/api/auth/logout", Some(&admin), None).await;
    let cleared = res.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let res = call(&router, Method::GET, "/api/auth/me", Some(&cleared), None).await;
    assert_eq!(json_body(res).await, Value::Null);
}
