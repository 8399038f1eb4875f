use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Unchanged, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entity::service;

use super::{Store, StoreError, degrade};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl Store {
    pub async fn list_services(&self) -> Result<Vec<service::Model>, StoreError> {
        let Some(db) = self.reader("services") else {
            return Ok(Vec::new());
        };
        let rows = service::Entity::find()
            .order_by_asc(service::Column::SortOrder)
            .order_by_asc(service::Column::Id)
            .all(db)
            .await;
        degrade("services", rows)
    }

    pub async fn get_service(&self, id: i32) -> Result<Option<service::Model>, StoreError> {
        let Some(db) = self.reader("service") else {
            return Ok(None);
        };
        degrade("service", service::Entity::find_by_id(id).one(db).await)
    }

    pub async fn create_service(&self, input: NewService) -> Result<service::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let model = service::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            icon: Set(input.icon),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    pub async fn update_service(
        &self,
        id: i32,
        changes: ServiceChanges,
    ) -> Result<service::Model, StoreError> {
        let db = self.writer()?;
        let mut active = service::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(icon) = changes.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(sort_order) = changes.sort_order {
            active.sort_order = Set(sort_order);
        }
        active
            .update(db)
            .await
            .map_err(|e| StoreError::from_update("service", e))
    }

    /// Returns whether a row was removed; a missing id is not an error.
    pub async fn delete_service(&self, id: i32) -> Result<bool, StoreError> {
        let db = self.writer()?;
        let res = service::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
