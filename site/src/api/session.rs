use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use cookie::{Cookie, SameSite, time::Duration};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::entity::user::{self, Role};

use super::{ApiErr, AppState};

const SECONDS_PER_DAY: u64 = 24 * 3600;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub email: String,
    pub role: Role,
    /// Unix timestamp expiry
    pub exp: u64,
}

pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Session lifetime in seconds. Saturates instead of overflowing on huge TTLs.
fn ttl_seconds(cfg: &SessionConfig) -> u64 {
    cfg.ttl_days.saturating_mul(SECONDS_PER_DAY)
}

/// Sign a session token for `user`, valid for the configured TTL.
pub fn issue_token(user: &user::Model, cfg: &SessionConfig) -> Result<String, ApiErr> {
    let exp = (Utc::now().timestamp() as u64).saturating_add(ttl_seconds(cfg));
    let claims = Claims {
        sub: user.id,
        email: user.email.clone().unwrap_or_default(),
        role: user.role,
        exp,
    };
    encode_jwt(&claims, &cfg.secret).map_err(ApiErr::internal)
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(cfg: &SessionConfig, token: &str) -> String {
    build_cookie(cfg, token.to_string(), ttl_seconds(cfg))
}

/// `Set-Cookie` value that expires the session immediately.
pub fn clear_cookie(cfg: &SessionConfig) -> String {
    build_cookie(cfg, String::new(), 0)
}

fn build_cookie(cfg: &SessionConfig, value: String, max_age_secs: u64) -> String {
    let max_age = Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX));
    Cookie::build((cfg.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure_cookies)
        .max_age(max_age)
        .build()
        .to_string()
}

/// Value of cookie `name` across all `Cookie` headers, with any surrounding
/// double quotes removed. Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve the session cookie to a live user. Missing, malformed or expired
/// tokens and deleted users all resolve to `None`.
async fn session_user(parts: &Parts, state: &AppState) -> Result<Option<user::Model>, ApiErr> {
    let cfg = &state.config.session;
    let Some(token) = read_cookie(&parts.headers, &cfg.cookie_name) else {
        return Ok(None);
    };
    let claims = match decode_jwt(&token, &cfg.secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid session cookie");
            return Ok(None);
        }
    };
    Ok(state.store.find_user_by_id(claims.sub).await?)
}

/// The role gate shared by every protected route.
pub async fn authorize(
    parts: &Parts,
    state: &AppState,
    required: Role,
) -> Result<user::Model, ApiErr> {
    let user = session_user(parts, state)
        .await?
        .ok_or(ApiErr::Unauthenticated)?;
    if !user.role.grants(required) {
        tracing::warn!(user_id = user.id, required = ?required, "insufficient role");
        return Err(ApiErr::Unauthorized);
    }
    Ok(user)
}

/// Extractor: the session user, if any. Never rejects on a bad cookie.
pub struct CurrentUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(CurrentUser(session_user(parts, &state).await?))
    }
}

/// Extractor: any signed-in user.
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        authorize(parts, &state, Role::User).await.map(AuthUser)
    }
}

/// Extractor: requires role == admin. Wraps every mutating route.
pub struct AdminUser(pub user::Model);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        authorize(parts, &state, Role::Admin).await.map(AdminUser)
    }
}
