use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl,
    dsl::{exists, select},
    insert_into,
    prelude::*,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::notification_history::{InsertNotificationHistoryEntity, NotificationHistoryEntity},
    repositories::notification_history::NotificationHistoryRepository,
    schema::notification_history,
};

pub struct NotificationHistoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationHistoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NotificationHistoryRepository for NotificationHistoryPostgres {
    async fn record(&self, insert_history_entity: InsertNotificationHistoryEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let history_id = insert_into(notification_history::table)
            .values(&insert_history_entity)
            .returning(notification_history::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(history_id)
    }

    async fn exists(&self, rule_id: Uuid, charge_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let already_sent = select(exists(
            notification_history::table
                .filter(notification_history::rule_id.eq(rule_id))
                .filter(notification_history::charge_id.eq(charge_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(already_sent)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<NotificationHistoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = notification_history::table
            .filter(notification_history::company_id.eq(company_id))
            .order(notification_history::sent_at.desc())
            .load::<NotificationHistoryEntity>(&mut conn)?;

        Ok(results)
    }
}
