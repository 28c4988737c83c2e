use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::clients::{ClientEntity, InsertClientEntity};

#[async_trait]
#[automock]
pub trait ClientRepository {
    async fn create(&self, insert_client_entity: InsertClientEntity) -> Result<Uuid>;
    async fn find_by_id_and_company(
        &self,
        client_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ClientEntity>>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ClientEntity>>;
    async fn deactivate(&self, client_id: Uuid, company_id: Uuid) -> Result<()>;
}
