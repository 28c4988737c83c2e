use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::whatsapp_logs::{InsertWhatsAppLogEntity, WhatsAppLogEntity},
    repositories::whatsapp_logs::WhatsAppLogRepository,
    schema::whatsapp_logs,
};

pub struct WhatsAppLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WhatsAppLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WhatsAppLogRepository for WhatsAppLogPostgres {
    async fn record(&self, insert_log_entity: InsertWhatsAppLogEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let log_id = insert_into(whatsapp_logs::table)
            .values(&insert_log_entity)
            .returning(whatsapp_logs::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(log_id)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<WhatsAppLogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = whatsapp_logs::table
            .filter(whatsapp_logs::company_id.eq(company_id))
            .order(whatsapp_logs::created_at.desc())
            .load::<WhatsAppLogEntity>(&mut conn)?;

        Ok(results)
    }
}
