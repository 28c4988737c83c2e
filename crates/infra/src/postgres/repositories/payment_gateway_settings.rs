use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::payment_gateway_settings::{
        InsertPaymentGatewaySettingEntity, PaymentGatewaySettingEntity,
    },
    repositories::payment_gateway_settings::PaymentGatewaySettingRepository,
    schema::payment_gateway_settings,
    value_objects::enums::payment_providers::PaymentProvider,
};

pub struct PaymentGatewaySettingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentGatewaySettingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentGatewaySettingRepository for PaymentGatewaySettingPostgres {
    async fn upsert(
        &self,
        insert_setting_entity: InsertPaymentGatewaySettingEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let setting_id = insert_into(payment_gateway_settings::table)
            .values(&insert_setting_entity)
            .on_conflict((
                payment_gateway_settings::company_id,
                payment_gateway_settings::provider,
            ))
            .do_update()
            .set((
                payment_gateway_settings::api_key.eq(&insert_setting_entity.api_key),
                payment_gateway_settings::api_token.eq(&insert_setting_entity.api_token),
                payment_gateway_settings::is_enabled.eq(insert_setting_entity.is_enabled),
                payment_gateway_settings::updated_at.eq(Utc::now()),
            ))
            .returning(payment_gateway_settings::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(setting_id)
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<PaymentGatewaySettingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_gateway_settings::table
            .filter(payment_gateway_settings::company_id.eq(company_id))
            .order(payment_gateway_settings::provider.asc())
            .load::<PaymentGatewaySettingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_default(
        &self,
        company_id: Uuid,
    ) -> Result<Option<PaymentGatewaySettingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let setting = payment_gateway_settings::table
            .filter(payment_gateway_settings::company_id.eq(company_id))
            .filter(payment_gateway_settings::is_default.eq(true))
            .first::<PaymentGatewaySettingEntity>(&mut conn)
            .optional()?;

        Ok(setting)
    }

    async fn find_by_provider(
        &self,
        company_id: Uuid,
        provider: PaymentProvider,
    ) -> Result<Option<PaymentGatewaySettingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let setting = payment_gateway_settings::table
            .filter(payment_gateway_settings::company_id.eq(company_id))
            .filter(payment_gateway_settings::provider.eq(provider.to_string()))
            .first::<PaymentGatewaySettingEntity>(&mut conn)
            .optional()?;

        Ok(setting)
    }

    async fn set_default(&self, company_id: Uuid, provider: PaymentProvider) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Clear-then-set must be one transaction; two racing requests would
        // otherwise leave zero or two defaults.
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            update(
                payment_gateway_settings::table
                    .filter(payment_gateway_settings::company_id.eq(company_id)),
            )
            .set(payment_gateway_settings::is_default.eq(false))
            .execute(conn)?;

            update(
                payment_gateway_settings::table
                    .filter(payment_gateway_settings::company_id.eq(company_id))
                    .filter(payment_gateway_settings::provider.eq(provider.to_string())),
            )
            .set((
                payment_gateway_settings::is_default.eq(true),
                payment_gateway_settings::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

            Ok(())
        })?;

        Ok(())
    }
}
