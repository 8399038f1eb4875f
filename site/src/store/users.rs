use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::user::{self, Role};

use super::{Store, StoreError, degrade};

pub const LOCAL_LOGIN_METHOD: &str = "local";

/// A password-login account. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

impl Store {
    /// First user registered under `email`.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        let Some(db) = self.reader("user") else {
            return Ok(None);
        };
        let row = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .order_by_asc(user::Column::Id)
            .one(db)
            .await;
        degrade("user", row)
    }

    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<user::Model>, StoreError> {
        let Some(db) = self.reader("user") else {
            return Ok(None);
        };
        degrade("user", user::Entity::find_by_id(id).one(db).await)
    }

    pub async fn create_user(&self, input: NewUser) -> Result<user::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let model = user::ActiveModel {
            open_id: Set(format!("{LOCAL_LOGIN_METHOD}-{}", Uuid::new_v4().simple())),
            name: Set(input.name),
            email: Set(Some(input.email)),
            password_hash: Set(Some(input.password_hash)),
            login_method: Set(Some(LOCAL_LOGIN_METHOD.to_string())),
            role: Set(input.role),
            created_at: Set(now),
            updated_at: Set(now),
            last_signed_in: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    pub async fn update_user_password(&self, id: i32, password_hash: String) -> Result<(), StoreError> {
        let db = self.writer()?;
        user::ActiveModel {
            id: Unchanged(id),
            password_hash: Set(Some(password_hash)),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(db)
        .await
        .map_err(|e| StoreError::from_update("user", e))?;
        Ok(())
    }

    pub async fn touch_last_signed_in(&self, id: i32) -> Result<(), StoreError> {
        let db = self.writer()?;
        user::ActiveModel {
            id: Unchanged(id),
            last_signed_in: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(db)
        .await
        .map_err(|e| StoreError::from_update("user", e))?;
        Ok(())
    }

    pub async fn count_users(&self) -> Result<u64, StoreError> {
        let db = self.writer()?;
        Ok(user::Entity::find().count(db).await?)
    }
}
