use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::notification_rules::{InsertNotificationRuleEntity, NotificationRuleEntity},
    repositories::notification_rules::NotificationRuleRepository,
    schema::notification_rules,
};

pub struct NotificationRulePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationRulePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NotificationRuleRepository for NotificationRulePostgres {
    async fn create(&self, insert_rule_entity: InsertNotificationRuleEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rule_id = insert_into(notification_rules::table)
            .values(&insert_rule_entity)
            .returning(notification_rules::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(rule_id)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<NotificationRuleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = notification_rules::table
            .filter(notification_rules::company_id.eq(company_id))
            .order(notification_rules::created_at.asc())
            .load::<NotificationRuleEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_active(&self) -> Result<Vec<NotificationRuleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = notification_rules::table
            .filter(notification_rules::is_active.eq(true))
            .load::<NotificationRuleEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_active(&self, rule_id: Uuid, company_id: Uuid, is_active: bool) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(
            notification_rules::table
                .filter(notification_rules::id.eq(rule_id))
                .filter(notification_rules::company_id.eq(company_id)),
        )
        .set(notification_rules::is_active.eq(is_active))
        .execute(&mut conn)?;

        Ok(())
    }
}
