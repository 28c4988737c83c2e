use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::charges::{ChargeEntity, InsertChargeEntity},
    repositories::charges::ChargeRepository,
    schema::charges,
    value_objects::enums::charge_statuses::ChargeStatus,
};

pub struct ChargePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChargePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ChargeRepository for ChargePostgres {
    async fn create(&self, insert_charge_entity: InsertChargeEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let charge_id = insert_into(charges::table)
            .values(&insert_charge_entity)
            .returning(charges::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(charge_id)
    }

    async fn find_by_id_and_company(
        &self,
        charge_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ChargeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let charge = charges::table
            .filter(charges::id.eq(charge_id))
            .filter(charges::company_id.eq(company_id))
            .first::<ChargeEntity>(&mut conn)
            .optional()?;

        Ok(charge)
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<ChargeStatus>,
    ) -> Result<Vec<ChargeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = charges::table
            .filter(charges::company_id.eq(company_id))
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(charges::status.eq(status.to_string()));
        }

        let results = query
            .order(charges::due_date.asc())
            .load::<ChargeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_unpaid_by_company(&self, company_id: Uuid) -> Result<Vec<ChargeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = charges::table
            .filter(charges::company_id.eq(company_id))
            .filter(charges::status.eq_any(vec![
                ChargeStatus::Pending.to_string(),
                ChargeStatus::Overdue.to_string(),
            ]))
            .order(charges::due_date.asc())
            .load::<ChargeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn attach_payment_link(
        &self,
        charge_id: Uuid,
        provider: String,
        provider_charge_id: String,
        payment_link: String,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(charges::table.filter(charges::id.eq(charge_id)))
            .set((
                charges::provider.eq(Some(provider)),
                charges::provider_charge_id.eq(Some(provider_charge_id)),
                charges::payment_link.eq(Some(payment_link)),
                charges::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn mark_paid(&self, charge_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The status guard makes the transition atomic: of two racing
        // settlements only one sees a row to update.
        let updated = update(
            charges::table
                .filter(charges::id.eq(charge_id))
                .filter(charges::status.ne(ChargeStatus::Paid.to_string())),
        )
        .set((
            charges::status.eq(ChargeStatus::Paid.to_string()),
            charges::paid_at.eq(Some(Utc::now())),
            charges::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(updated)
    }

    async fn update_status(&self, charge_id: Uuid, status: ChargeStatus) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(charges::table.filter(charges::id.eq(charge_id)))
            .set((
                charges::status.eq(status.to_string()),
                charges::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn mark_overdue_past_due(&self, today: NaiveDate) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(
            charges::table
                .filter(charges::status.eq(ChargeStatus::Pending.to_string()))
                .filter(charges::due_date.lt(today)),
        )
        .set((
            charges::status.eq(ChargeStatus::Overdue.to_string()),
            charges::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
