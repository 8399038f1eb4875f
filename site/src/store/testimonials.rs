use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    Select, Set,
};
use serde::Deserialize;

use crate::entity::testimonial;

use super::{Store, StoreError, degrade};

pub const DEFAULT_RATING: i32 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonial {
    pub client_name: String,
    pub client_role: Option<String>,
    pub project_type: Option<String>,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i32,
    pub image_url: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

fn default_rating() -> i32 {
    DEFAULT_RATING
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialChanges {
    pub client_name: Option<String>,
    pub client_role: Option<String>,
    pub project_type: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

fn ordered() -> Select<testimonial::Entity> {
    testimonial::Entity::find()
        .order_by_asc(testimonial::Column::SortOrder)
        .order_by_asc(testimonial::Column::Id)
}

impl Store {
    /// Published testimonials only, for the public page.
    pub async fn list_published_testimonials(
        &self,
    ) -> Result<Vec<testimonial::Model>, StoreError> {
        let Some(db) = self.reader("testimonials") else {
            return Ok(Vec::new());
        };
        let rows = ordered()
            .filter(testimonial::Column::IsPublished.eq(true))
            .all(db)
            .await;
        degrade("testimonials", rows)
    }

    pub async fn list_testimonials(&self) -> Result<Vec<testimonial::Model>, StoreError> {
        let Some(db) = self.reader("testimonials") else {
            return Ok(Vec::new());
        };
        degrade("testimonials", ordered().all(db).await)
    }

    pub async fn get_testimonial(&self, id: i32) -> Result<Option<testimonial::Model>, StoreError> {
        let Some(db) = self.reader("testimonial") else {
            return Ok(None);
        };
        degrade("testimonial", testimonial::Entity::find_by_id(id).one(db).await)
    }

    pub async fn create_testimonial(
        &self,
        input: NewTestimonial,
    ) -> Result<testimonial::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let model = testimonial::ActiveModel {
            client_name: Set(input.client_name),
            client_role: Set(input.client_role),
            project_type: Set(input.project_type),
            content: Set(input.content),
            rating: Set(input.rating),
            image_url: Set(input.image_url),
            is_published: Set(input.is_published),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    pub async fn update_testimonial(
        &self,
        id: i32,
        changes: TestimonialChanges,
    ) -> Result<testimonial::Model, StoreError> {
        let db = self.writer()?;
        let mut active = testimonial::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Some(client_name) = changes.client_name {
            active.client_name = Set(client_name);
        }
        if let Some(client_role) = changes.client_role {
            active.client_role = Set(Some(client_role));
        }
        if let Some(project_type) = changes.project_type {
            active.project_type = Set(Some(project_type));
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(is_published) = changes.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(sort_order) = changes.sort_order {
            active.sort_order = Set(sort_order);
        }
        active
            .update(db)
            .await
            .map_err(|e| StoreError::from_update("testimonial", e))
    }

    pub async fn set_testimonial_published(
        &self,
        id: i32,
        is_published: bool,
    ) -> Result<testimonial::Model, StoreError> {
        self.update_testimonial(
            id,
            TestimonialChanges {
                is_published: Some(is_published),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_testimonial(&self, id: i32) -> Result<bool, StoreError> {
        let db = self.writer()?;
        let res = testimonial::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
