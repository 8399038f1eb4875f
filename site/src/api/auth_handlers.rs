use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{
    ApiErr, AppState,
    dto::{ChangePasswordRequest, LoginRequest, LoginResponse, SuccessResponse, UserSummary},
    extract::Json,
    session::{AuthUser, CurrentUser, clear_cookie, issue_token, session_cookie},
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiErr> {
    let (Some(email), Some(password)) = (non_empty(body.email), non_empty(body.password)) else {
        return Err(ApiErr::validation("email and password are required"));
    };

    let user = state
        .auth
        .authenticate(email.trim(), &password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "login rejected"))?;

    let token = issue_token(&user, &state.config.session)?;
    let cookie = session_cookie(&state.config.session, &token);
    tracing::info!(user_id = user.id, role = ?user.role, "user signed in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: UserSummary::from(user),
        }),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, clear_cookie(&state.config.session))],
        Json(SuccessResponse::ok()),
    )
        .into_response()
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Option<UserSummary>> {
    Json(user.map(UserSummary::from))
}

pub async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiErr> {
    let (Some(current), Some(new)) = (
        non_empty(body.current_password),
        non_empty(body.new_password),
    ) else {
        return Err(ApiErr::validation("currentPassword and newPassword are required"));
    };

    state.auth.change_password(user.id, &current, &new).await?;
    tracing::info!(user_id = user.id, "password changed");
    Ok(Json(SuccessResponse::ok()))
}
