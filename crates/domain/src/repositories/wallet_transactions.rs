use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::wallet_transactions::{
    InsertWalletTransactionEntity, WalletTransactionEntity,
};

#[async_trait]
#[automock]
pub trait WalletTransactionRepository {
    /// Inserts the ledger entry unless one already exists for the charge.
    /// Returns true when a row was written. Backed by a unique index on
    /// `charge_id`, which is what makes reconciliation idempotent.
    async fn credit_once(
        &self,
        insert_transaction_entity: InsertWalletTransactionEntity,
    ) -> Result<bool>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<WalletTransactionEntity>>;
}
