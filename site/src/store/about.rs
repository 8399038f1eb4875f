use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};
use serde::Deserialize;

use crate::entity::about_content;

use super::{Store, StoreError, degrade};

/// Body of an about-section upsert. The section key comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSectionInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Store {
    /// All sections in insertion order.
    pub async fn list_about_content(&self) -> Result<Vec<about_content::Model>, StoreError> {
        let Some(db) = self.reader("about content") else {
            return Ok(Vec::new());
        };
        let rows = about_content::Entity::find()
            .order_by_asc(about_content::Column::Id)
            .all(db)
            .await;
        degrade("about content", rows)
    }

    pub async fn get_about_section(
        &self,
        section: &str,
    ) -> Result<Option<about_content::Model>, StoreError> {
        let Some(db) = self.reader("about section") else {
            return Ok(None);
        };
        let row = about_content::Entity::find()
            .filter(about_content::Column::Section.eq(section))
            .one(db)
            .await;
        degrade("about section", row)
    }

    /// Insert the section or overwrite the provided fields of the existing row,
    /// in one `INSERT … ON CONFLICT (section) DO UPDATE` statement.
    pub async fn upsert_about_section(
        &self,
        section: &str,
        input: AboutSectionInput,
    ) -> Result<about_content::Model, StoreError> {
        let db = self.writer()?;

        let mut overwrite = vec![about_content::Column::UpdatedAt];
        if input.title.is_some() {
            overwrite.push(about_content::Column::Title);
        }
        if input.content.is_some() {
            overwrite.push(about_content::Column::Content);
        }

        let row = about_content::ActiveModel {
            section: Set(section.to_owned()),
            title: Set(input.title),
            content: Set(input.content),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        about_content::Entity::insert(row)
            .on_conflict(
                OnConflict::column(about_content::Column::Section)
                    .update_columns(overwrite)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        about_content::Entity::find()
            .filter(about_content::Column::Section.eq(section))
            .one(db)
            .await?
            .ok_or(StoreError::NotFound("about section"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;

    fn input(title: Option<&str>, content: Option<&str>) -> AboutSectionInput {
        AboutSectionInput {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_row_with_second_write() {
        let store = memory_store().await;
        store
            .upsert_about_section("who_we_are", input(Some("Qui"), Some("v1")))
            .await
            .unwrap();
        let second = store
            .upsert_about_section("who_we_are", input(Some("Qui Sommes-Nous ?"), Some("v2")))
            .await
            .unwrap();

        let all = store.list_about_content().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], second);
        assert_eq!(second.title.as_deref(), Some("Qui Sommes-Nous ?"));
        assert_eq!(second.content.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn upsert_keeps_fields_not_provided() {
        let store = memory_store().await;
        store
            .upsert_about_section("values", input(Some("Nos Valeurs"), Some("Qualité")))
            .await
            .unwrap();
        let updated = store
            .upsert_about_section("values", input(None, Some("Qualité et professionnalisme")))
            .await
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("Nos Valeurs"));
        assert_eq!(updated.content.as_deref(), Some("Qualité et professionnalisme"));
    }

    #[tokio::test]
    async fn list_returns_insertion_order() {
        let store = memory_store().await;
        for section in ["header", "who_we_are", "expertise"] {
            store
                .upsert_about_section(section, input(Some(section), None))
                .await
                .unwrap();
        }
        store
            .upsert_about_section("header", input(Some("À Propos"), None))
            .await
            .unwrap();

        let sections: Vec<_> = store
            .list_about_content()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.section)
            .collect();
        assert_eq!(sections, ["header", "who_we_are", "expertise"]);
    }

    #[tokio::test]
    async fn missing_section_is_none() {
        let store = memory_store().await;
        assert!(store.get_about_section("nope").await.unwrap().is_none());
    }
}
