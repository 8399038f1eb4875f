use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;

use crate::entity::contact_info;

use super::{Store, StoreError, degrade};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactChanges {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Store {
    /// The first contact row, if any.
    pub async fn get_contact_info(&self) -> Result<Option<contact_info::Model>, StoreError> {
        let Some(db) = self.reader("contact info") else {
            return Ok(None);
        };
        let row = contact_info::Entity::find()
            .order_by_asc(contact_info::Column::Id)
            .one(db)
            .await;
        degrade("contact info", row)
    }

    /// Update the first contact row, creating it when the table is empty.
    pub async fn update_contact_info(
        &self,
        changes: ContactChanges,
    ) -> Result<contact_info::Model, StoreError> {
        let db = self.writer()?;
        let now = Utc::now().naive_utc();
        let txn = db.begin().await?;

        let existing = contact_info::Entity::find()
            .order_by_asc(contact_info::Column::Id)
            .one(&txn)
            .await?;

        let model = match existing {
            Some(row) => {
                let mut active: contact_info::ActiveModel = row.into();
                if let Some(phone) = changes.phone {
                    active.phone = Set(Some(phone));
                }
                if let Some(email) = changes.email {
                    active.email = Set(Some(email));
                }
                if let Some(address) = changes.address {
                    active.address = Set(Some(address));
                }
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                contact_info::ActiveModel {
                    phone: Set(changes.phone),
                    email: Set(changes.email),
                    address: Set(changes.address),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;
        Ok(model)
    }
}
