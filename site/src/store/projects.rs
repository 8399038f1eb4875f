use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Deserialize;

use crate::entity::{project, project_image};

use super::{Store, StoreError, degrade};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectImage {
    pub image_url: String,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

impl Store {
    pub async fn list_projects(&self) -> Result<Vec<project::Model>, StoreError> {
        let Some(db) = self.reader("projects") else {
            return Ok(Vec::new());
        };
        let rows = project::Entity::find()
            .order_by_asc(project::Column::SortOrder)
            .order_by_asc(project::Column::Id)
            .all(db)
            .await;
        degrade("projects", rows)
    }

    pub async fn get_project(&self, id: i32) -> Result<Option<project::Model>, StoreError> {
        let Some(db) = self.reader("project") else {
            return Ok(None);
        };
        degrade("project", project::Entity::find_by_id(id).one(db).await)
    }

    pub async fn create_project(&self, input: NewProject) -> Result<project::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let model = project::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            image_url: Set(input.image_url),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    pub async fn update_project(
        &self,
        id: i32,
        changes: ProjectChanges,
    ) -> Result<project::Model, StoreError> {
        let db = self.writer()?;
        let mut active = project::ActiveModel {
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
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(sort_order) = changes.sort_order {
            active.sort_order = Set(sort_order);
        }
        active
            .update(db)
            .await
            .map_err(|e| StoreError::from_update("project", e))
    }

    /// Delete a project together with its gallery images.
    pub async fn delete_project(&self, id: i32) -> Result<bool, StoreError> {
        let db = self.writer()?;
        let txn = db.begin().await?;

        project_image::Entity::delete_many()
            .filter(project_image::Column::ProjectId.eq(id))
            .exec(&txn)
            .await?;
        let res = project::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    // ---------- gallery images ----------

    pub async fn list_project_images(
        &self,
        project_id: i32,
    ) -> Result<Vec<project_image::Model>, StoreError> {
        let Some(db) = self.reader("project images") else {
            return Ok(Vec::new());
        };
        let rows = project_image::Entity::find()
            .filter(project_image::Column::ProjectId.eq(project_id))
            .order_by_asc(project_image::Column::SortOrder)
            .order_by_asc(project_image::Column::Id)
            .all(db)
            .await;
        degrade("project images", rows)
    }

    pub async fn create_project_image(
        &self,
        project_id: i32,
        input: NewProjectImage,
    ) -> Result<project_image::Model, StoreError> {
        let db = self.writer()?;

        project::Entity::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or(StoreError::NotFound("project"))?;

        let model = project_image::ActiveModel {
            project_id: Set(project_id),
            image_url: Set(input.image_url),
            sort_order: Set(input.sort_order),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    pub async fn delete_project_image(&self, id: i32) -> Result<bool, StoreError> {
        let db = self.writer()?;
        let res = project_image::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Remove every image of a project. Returns the number removed.
    pub async fn delete_project_images(&self, project_id: i32) -> Result<u64, StoreError> {
        let db = self.writer()?;
        let res = project_image::Entity::delete_many()
            .filter(project_image::Column::ProjectId.eq(project_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;

    fn new_project(title: &str, order: i32) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: Some("Rénovation intégrale".to_string()),
            image_url: Some(format!("/projects/{order}/1.jpg")),
            sort_order: order,
        }
    }

    fn image(url: &str, order: i32) -> NewProjectImage {
        NewProjectImage {
            image_url: url.to_string(),
            sort_order: order,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = memory_store().await;
        let created = store
            .create_project(new_project("Crépi sur Façade", 2))
            .await
            .unwrap();

        let fetched = store.get_project(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.image_url.as_deref(), Some("/projects/2/1.jpg"));
    }

    #[tokio::test]
    async fn list_orders_by_display_order_then_id() {
        let store = memory_store().await;
        store.create_project(new_project("B", 2)).await.unwrap();
        store.create_project(new_project("A1", 1)).await.unwrap();
        store.create_project(new_project("A2", 1)).await.unwrap();

        let titles: Vec<_> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["A1", "A2", "B"]);
    }

    #[tokio::test]
    async fn images_are_listed_per_project_in_order() {
        let store = memory_store().await;
        let p1 = store.create_project(new_project("Chambre", 1)).await.unwrap();
        let p2 = store.create_project(new_project("Caisson", 2)).await.unwrap();

        store.create_project_image(p1.id, image("/c/2.jpg", 1)).await.unwrap();
        store.create_project_image(p1.id, image("/c/1.jpg", 0)).await.unwrap();
        store.create_project_image(p2.id, image("/k/1.jpg", 0)).await.unwrap();

        let urls: Vec<_> = store
            .list_project_images(p1.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.image_url)
            .collect();
        assert_eq!(urls, ["/c/1.jpg", "/c/2.jpg"]);
    }

    #[tokio::test]
    async fn image_for_missing_project_is_not_found() {
        let store = memory_store().await;
        let err = store
            .create_project_image(42, image("/x.jpg", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("project")));
    }

    #[tokio::test]
    async fn delete_project_cascades_to_its_images_only() {
        let store = memory_store().await;
        let doomed = store.create_project(new_project("Suite", 1)).await.unwrap();
        let kept = store.create_project(new_project("Îlot", 2)).await.unwrap();
        for n in 0..3 {
            store
                .create_project_image(doomed.id, image(&format!("/s/{n}.jpg"), n))
                .await
                .unwrap();
        }
        store.create_project_image(kept.id, image("/i/0.jpg", 0)).await.unwrap();

        assert!(store.delete_project(doomed.id).await.unwrap());

        assert!(store.get_project(doomed.id).await.unwrap().is_none());
        assert!(store.list_project_images(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.list_project_images(kept.id).await.unwrap().len(), 1);
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_single_and_all_images() {
        let store = memory_store().await;
        let p = store.create_project(new_project("Chambre", 1)).await.unwrap();
        let first = store.create_project_image(p.id, image("/a.jpg", 0)).await.unwrap();
        store.create_project_image(p.id, image("/b.jpg", 1)).await.unwrap();
        store.create_project_image(p.id, image("/c.jpg", 2)).await.unwrap();

        assert!(store.delete_project_image(first.id).await.unwrap());
        assert!(!store.delete_project_image(first.id).await.unwrap());
        assert_eq!(store.delete_project_images(p.id).await.unwrap(), 2);
        assert!(store.list_project_images(p.id).await.unwrap().is_empty());
        assert!(store.get_project(p.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_cover_image() {
        let store = memory_store().await;
        let p = store.create_project(new_project("Chambre", 1)).await.unwrap();
        let updated = store
            .update_project(
                p.id,
                ProjectChanges {
                    image_url: Some("/new.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("/new.jpg"));
        assert_eq!(updated.title, "Chambre");
    }
}
