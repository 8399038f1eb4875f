use serde::{Deserialize, Serialize};

use crate::entity::user::{self, Role};

// ---------- auth requests ----------

/// Fields are optional so a missing one surfaces as a 400, not a body rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

// ---------- auth responses ----------

#[derive(Debug, Serialize, Clone)]
pub struct UserSummary {
    pub id: i32,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            name: m.name,
            role: m.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ---------- content ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRequest {
    pub is_published: bool,
}

/// Result of a delete. Deleting a missing id succeeds with `deleted: false`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

impl From<bool> for DeleteResponse {
    fn from(deleted: bool) -> Self {
        Self {
            success: true,
            deleted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
}
