use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::message_templates::{InsertMessageTemplateEntity, MessageTemplateEntity},
    repositories::message_templates::MessageTemplateRepository,
    schema::message_templates,
};

pub struct MessageTemplatePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MessageTemplatePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessageTemplateRepository for MessageTemplatePostgres {
    async fn create(&self, insert_template_entity: InsertMessageTemplateEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let template_id = insert_into(message_templates::table)
            .values(&insert_template_entity)
            .returning(message_templates::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(template_id)
    }

    async fn find_by_id(&self, template_id: Uuid) -> Result<Option<MessageTemplateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let template = message_templates::table
            .filter(message_templates::id.eq(template_id))
            .first::<MessageTemplateEntity>(&mut conn)
            .optional()?;

        Ok(template)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<MessageTemplateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = message_templates::table
            .filter(message_templates::company_id.eq(company_id))
            .order(message_templates::name.asc())
            .load::<MessageTemplateEntity>(&mut conn)?;

        Ok(results)
    }
}
