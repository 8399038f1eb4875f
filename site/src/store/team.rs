use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Unchanged, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entity::team_member;

use super::{Store, StoreError, degrade};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeamMember {
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberChanges {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl Store {
    pub async fn list_team_members(&self) -> Result<Vec<team_member::Model>, StoreError> {
        let Some(db) = self.reader("team members") else {
            return Ok(Vec::new());
        };
        let rows = team_member::Entity::find()
            .order_by_asc(team_member::Column::SortOrder)
            .order_by_asc(team_member::Column::Id)
            .all(db)
            .await;
        degrade("team members", rows)
    }

    pub async fn get_team_member(&self, id: i32) -> Result<Option<team_member::Model>, StoreError> {
        let Some(db) = self.reader("team member") else {
            return Ok(None);
        };
        degrade("team member", team_member::Entity::find_by_id(id).one(db).await)
    }

    pub async fn create_team_member(
        &self,
        input: NewTeamMember,
    ) -> Result<team_member::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let model = team_member::ActiveModel {
            name: Set(input.name),
            role: Set(input.role),
            bio: Set(input.bio),
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

    pub async fn update_team_member(
        &self,
        id: i32,
        changes: TeamMemberChanges,
    ) -> Result<team_member::Model, StoreError> {
        let db = self.writer()?;
        let mut active = team_member::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(role) = changes.role {
            active.role = Set(Some(role));
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
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
            .map_err(|e| StoreError::from_update("team member", e))
    }

    pub async fn delete_team_member(&self, id: i32) -> Result<bool, StoreError> {
        let db = self.writer()?;
        let res = team_member::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
