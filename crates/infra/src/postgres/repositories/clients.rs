use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::clients::{ClientEntity, InsertClientEntity},
    repositories::clients::ClientRepository,
    schema::clients,
};

pub struct ClientPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ClientPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ClientRepository for ClientPostgres {
    async fn create(&self, insert_client_entity: InsertClientEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let client_id = insert_into(clients::table)
            .values(&insert_client_entity)
            .returning(clients::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(client_id)
    }

    async fn find_by_id_and_company(
        &self,
        client_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ClientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let client = clients::table
            .filter(clients::id.eq(client_id))
            .filter(clients::company_id.eq(company_id))
            .first::<ClientEntity>(&mut conn)
            .optional()?;

        Ok(client)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ClientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = clients::table
            .filter(clients::company_id.eq(company_id))
            .filter(clients::is_active.eq(true))
            .order(clients::name.asc())
            .load::<ClientEntity>(&mut conn)?;

        Ok(results)
    }

    async fn deactivate(&self, client_id: Uuid, company_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(
            clients::table
                .filter(clients::id.eq(client_id))
                .filter(clients::company_id.eq(company_id)),
        )
        .set(clients::is_active.eq(false))
        .execute(&mut conn)?;

        Ok(())
    }
}
