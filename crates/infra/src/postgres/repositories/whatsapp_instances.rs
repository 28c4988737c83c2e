use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::whatsapp_instances::{InsertWhatsAppInstanceEntity, WhatsAppInstanceEntity},
    repositories::whatsapp_instances::WhatsAppInstanceRepository,
    schema::whatsapp_instances,
    value_objects::enums::whatsapp_statuses::WhatsAppStatus,
};

pub struct WhatsAppInstancePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WhatsAppInstancePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WhatsAppInstanceRepository for WhatsAppInstancePostgres {
    async fn upsert(&self, insert_instance_entity: InsertWhatsAppInstanceEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // One instance per company; reconnecting replaces the credentials.
        let instance_id = insert_into(whatsapp_instances::table)
            .values(&insert_instance_entity)
            .on_conflict(whatsapp_instances::company_id)
            .do_update()
            .set((
                whatsapp_instances::instance_id.eq(&insert_instance_entity.instance_id),
                whatsapp_instances::instance_token.eq(&insert_instance_entity.instance_token),
                whatsapp_instances::status.eq(&insert_instance_entity.status),
                whatsapp_instances::qr_code.eq(&insert_instance_entity.qr_code),
                whatsapp_instances::updated_at.eq(Utc::now()),
            ))
            .returning(whatsapp_instances::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(instance_id)
    }

    async fn find_by_company(&self, company_id: Uuid) -> Result<Option<WhatsAppInstanceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let instance = whatsapp_instances::table
            .filter(whatsapp_instances::company_id.eq(company_id))
            .first::<WhatsAppInstanceEntity>(&mut conn)
            .optional()?;

        Ok(instance)
    }

    async fn update_status(
        &self,
        company_id: Uuid,
        status: WhatsAppStatus,
        qr_code: Option<String>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let connected_at = match status {
            WhatsAppStatus::Connected => Some(Utc::now()),
            _ => None,
        };

        update(
            whatsapp_instances::table
                .filter(whatsapp_instances::company_id.eq(company_id)),
        )
        .set((
            whatsapp_instances::status.eq(status.to_string()),
            whatsapp_instances::qr_code.eq(qr_code),
            whatsapp_instances::connected_at.eq(connected_at),
            whatsapp_instances::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(())
    }
}
