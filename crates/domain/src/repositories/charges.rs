use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::{
    entities::charges::{ChargeEntity, InsertChargeEntity},
    value_objects::enums::charge_statuses::ChargeStatus,
};

#[async_trait]
#[automock]
pub trait ChargeRepository {
    async fn create(&self, insert_charge_entity: InsertChargeEntity) -> Result<Uuid>;
    async fn find_by_id_and_company(
        &self,
        charge_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ChargeEntity>>;
    async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<ChargeStatus>,
    ) -> Result<Vec<ChargeEntity>>;
    /// Unpaid means `pending` or `overdue`; the notification engine scans these.
    async fn list_unpaid_by_company(&self, company_id: Uuid) -> Result<Vec<ChargeEntity>>;
    async fn attach_payment_link(
        &self,
        charge_id: Uuid,
        provider: String,
        provider_charge_id: String,
        payment_link: String,
    ) -> Result<()>;
    /// Returns the number of rows updated; zero means the charge was already paid.
    async fn mark_paid(&self, charge_id: Uuid) -> Result<usize>;
    async fn update_status(&self, charge_id: Uuid, status: ChargeStatus) -> Result<()>;
    /// Flips past-due pending charges to overdue; returns how many changed.
    async fn mark_overdue_past_due(&self, today: NaiveDate) -> Result<usize>;
}
