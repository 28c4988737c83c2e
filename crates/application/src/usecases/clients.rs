use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    documents::validate_document,
    entities::clients::{ClientEntity, InsertClientEntity},
    repositories::clients::ClientRepository,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client document")]
    InvalidDocument,
    #[error("client not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ClientError::InvalidDocument => StatusCode::BAD_REQUEST,
            ClientError::NotFound => StatusCode::NOT_FOUND,
            ClientError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertClientModel {
    pub name: String,
    pub document: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDto {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub phone: String,
    pub email: Option<String>,
    pub is_active: bool,
}

impl From<ClientEntity> for ClientDto {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            document: entity.document,
            phone: entity.phone,
            email: entity.email,
            is_active: entity.is_active,
        }
    }
}

pub struct ClientUseCase<C>
where
    C: ClientRepository + Send + Sync + 'static,
{
    client_repo: Arc<C>,
}

impl<C> ClientUseCase<C>
where
    C: ClientRepository + Send + Sync + 'static,
{
    pub fn new(client_repo: Arc<C>) -> Self {
        Self { client_repo }
    }

    pub async fn create_client(
        &self,
        company_id: Uuid,
        model: InsertClientModel,
    ) -> Result<Uuid, ClientError> {
        if !validate_document(&model.document) {
            warn!(%company_id, "clients: rejected invalid document");
            return Err(ClientError::InvalidDocument);
        }

        let client_id = self
            .client_repo
            .create(InsertClientEntity {
                company_id,
                name: model.name,
                document: model.document,
                phone: model.phone,
                email: model.email,
            })
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "clients: failed to insert client");
                ClientError::Internal(err)
            })?;

        info!(%company_id, %client_id, "clients: client created");
        Ok(client_id)
    }

    pub async fn list_clients(&self, company_id: Uuid) -> Result<Vec<ClientDto>, ClientError> {
        let clients = self
            .client_repo
            .list_by_company(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "clients: failed to list clients");
                ClientError::Internal(err)
            })?;

        Ok(clients.into_iter().map(ClientDto::from).collect())
    }

    pub async fn deactivate_client(
        &self,
        company_id: Uuid,
        client_id: Uuid,
    ) -> Result<(), ClientError> {
        self.client_repo
            .find_by_id_and_company(client_id, company_id)
            .await
            .map_err(ClientError::Internal)?
            .ok_or(ClientError::NotFound)?;

        self.client_repo
            .deactivate(client_id, company_id)
            .await
            .map_err(|err| {
                error!(%company_id, %client_id, db_error = ?err, "clients: failed to deactivate");
                ClientError::Internal(err)
            })?;

        info!(%company_id, %client_id, "clients: client deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::repositories::clients::MockClientRepository;

    fn sample_model() -> InsertClientModel {
        InsertClientModel {
            name: "Empresa Exemplo".to_string(),
            document: "11222333000181".to_string(),
            phone: "5511999990000".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn rejects_invalid_document() {
        let usecase = ClientUseCase::new(Arc::new(MockClientRepository::new()));

        let mut model = sample_model();
        model.document = "12345".to_string();

        let result = usecase.create_client(Uuid::new_v4(), model).await;
        assert!(matches!(result, Err(ClientError::InvalidDocument)));
    }

    #[tokio::test]
    async fn creates_client_with_valid_cnpj() {
        let client_id = Uuid::new_v4();
        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_create()
            .returning(move |_| Box::pin(async move { Ok(client_id) }));

        let usecase = ClientUseCase::new(Arc::new(client_repo));
        let created = usecase
            .create_client(Uuid::new_v4(), sample_model())
            .await
            .unwrap();
        assert_eq!(created, client_id);
    }

    #[tokio::test]
    async fn deactivate_missing_client_is_not_found() {
        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_find_by_id_and_company()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = ClientUseCase::new(Arc::new(client_repo));
        let result = usecase
            .deactivate_client(Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(ClientError::NotFound)));
    }
}
