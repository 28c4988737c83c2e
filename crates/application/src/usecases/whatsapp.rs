use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    entities::{
        whatsapp_instances::InsertWhatsAppInstanceEntity, whatsapp_logs::InsertWhatsAppLogEntity,
    },
    repositories::{
        whatsapp_instances::WhatsAppInstanceRepository, whatsapp_logs::WhatsAppLogRepository,
    },
    value_objects::{
        enums::{notification_statuses::NotificationStatus, whatsapp_statuses::WhatsAppStatus},
        whatsapp::{SendMessageModel, WhatsAppInstanceDto},
    },
};
use messaging::{ConnectionState, InstanceCredentials, WhatsAppGateway};

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("no whatsapp instance for this company")]
    InstanceNotFound,
    #[error("whatsapp instance is not connected")]
    NotConnected,
    #[error("phone and message are required")]
    EmptyMessage,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WhatsAppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            WhatsAppError::InstanceNotFound => StatusCode::NOT_FOUND,
            WhatsAppError::NotConnected => StatusCode::CONFLICT,
            WhatsAppError::EmptyMessage => StatusCode::BAD_REQUEST,
            WhatsAppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn status_of(state: ConnectionState) -> WhatsAppStatus {
    match state {
        ConnectionState::Disconnected => WhatsAppStatus::Disconnected,
        ConnectionState::Connecting => WhatsAppStatus::Connecting,
        ConnectionState::Connected => WhatsAppStatus::Connected,
    }
}

pub struct WhatsAppUseCase<I, L, W>
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    instance_repo: Arc<I>,
    log_repo: Arc<L>,
    whatsapp: Arc<W>,
}

impl<I, L, W> WhatsAppUseCase<I, L, W>
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    pub fn new(instance_repo: Arc<I>, log_repo: Arc<L>, whatsapp: Arc<W>) -> Self {
        Self {
            instance_repo,
            log_repo,
            whatsapp,
        }
    }

    /// Provisions an instance for the company, or reuses the existing one,
    /// and returns the QR code the user scans to link their phone.
    pub async fn connect(&self, company_id: Uuid) -> Result<WhatsAppInstanceDto, WhatsAppError> {
        let credentials = match self
            .instance_repo
            .find_by_company(company_id)
            .await
            .map_err(WhatsAppError::Internal)?
        {
            Some(instance) => InstanceCredentials {
                instance_id: instance.instance_id,
                instance_token: instance.instance_token,
            },
            None => {
                let credentials = self
                    .whatsapp
                    .create_instance(&format!("pagoupix-{company_id}"))
                    .await
                    .map_err(|err| {
                        error!(%company_id, error = ?err, "whatsapp: instance provisioning failed");
                        WhatsAppError::Internal(err)
                    })?;
                info!(%company_id, "whatsapp: instance provisioned");
                credentials
            }
        };

        let qr_code = self
            .whatsapp
            .fetch_qr_code(&credentials)
            .await
            .map_err(|err| {
                error!(%company_id, error = ?err, "whatsapp: qr code fetch failed");
                WhatsAppError::Internal(err)
            })?;

        self.instance_repo
            .upsert(InsertWhatsAppInstanceEntity {
                company_id,
                instance_id: credentials.instance_id,
                instance_token: credentials.instance_token,
                status: WhatsAppStatus::Connecting.to_string(),
                qr_code,
            })
            .await
            .map_err(WhatsAppError::Internal)?;

        self.instance_dto(company_id).await
    }

    /// Polls the provider for the live connection state and mirrors it into
    /// the database.
    pub async fn refresh_status(
        &self,
        company_id: Uuid,
    ) -> Result<WhatsAppInstanceDto, WhatsAppError> {
        let instance = self
            .instance_repo
            .find_by_company(company_id)
            .await
            .map_err(WhatsAppError::Internal)?
            .ok_or(WhatsAppError::InstanceNotFound)?;

        let credentials = InstanceCredentials {
            instance_id: instance.instance_id,
            instance_token: instance.instance_token,
        };

        let state = self
            .whatsapp
            .fetch_status(&credentials)
            .await
            .map_err(|err| {
                error!(%company_id, error = ?err, "whatsapp: status fetch failed");
                WhatsAppError::Internal(err)
            })?;
        let status = status_of(state);

        // A connected instance has no QR code to show any more.
        let qr_code = match status {
            WhatsAppStatus::Connected => None,
            _ => instance.qr_code,
        };

        self.instance_repo
            .update_status(company_id, status, qr_code)
            .await
            .map_err(WhatsAppError::Internal)?;

        info!(%company_id, status = %status, "whatsapp: status refreshed");
        self.instance_dto(company_id).await
    }

    pub async fn disconnect(&self, company_id: Uuid) -> Result<(), WhatsAppError> {
        let instance = self
            .instance_repo
            .find_by_company(company_id)
            .await
            .map_err(WhatsAppError::Internal)?
            .ok_or(WhatsAppError::InstanceNotFound)?;

        let credentials = InstanceCredentials {
            instance_id: instance.instance_id,
            instance_token: instance.instance_token,
        };

        if let Err(err) = self.whatsapp.disconnect(&credentials).await {
            // The provider may already consider the session gone; the local
            // state still has to reflect the disconnect.
            warn!(%company_id, error = ?err, "whatsapp: provider disconnect failed");
        }

        self.instance_repo
            .update_status(company_id, WhatsAppStatus::Disconnected, None)
            .await
            .map_err(WhatsAppError::Internal)?;

        info!(%company_id, "whatsapp: instance disconnected");
        Ok(())
    }

    /// Ad-hoc message outside the notification rules, e.g. a manual
    /// follow-up from the dashboard.
    pub async fn send_message(
        &self,
        company_id: Uuid,
        model: SendMessageModel,
    ) -> Result<(), WhatsAppError> {
        if model.phone.trim().is_empty() || model.message.trim().is_empty() {
            return Err(WhatsAppError::EmptyMessage);
        }

        let instance = self
            .instance_repo
            .find_by_company(company_id)
            .await
            .map_err(WhatsAppError::Internal)?
            .ok_or(WhatsAppError::InstanceNotFound)?;

        if WhatsAppStatus::from_str(&instance.status) != Some(WhatsAppStatus::Connected) {
            return Err(WhatsAppError::NotConnected);
        }

        let credentials = InstanceCredentials {
            instance_id: instance.instance_id,
            instance_token: instance.instance_token,
        };

        let send_result = self
            .whatsapp
            .send_text(&credentials, &model.phone, &model.message)
            .await;

        let (status, send_error) = match &send_result {
            Ok(_) => (NotificationStatus::Sent, None),
            Err(err) => (NotificationStatus::Failed, Some(err.to_string())),
        };

        self.log_repo
            .record(InsertWhatsAppLogEntity {
                company_id,
                phone: model.phone,
                message: model.message,
                status: status.to_string(),
                error: send_error,
            })
            .await
            .map_err(WhatsAppError::Internal)?;

        match send_result {
            Ok(message_id) => {
                info!(%company_id, %message_id, "whatsapp: manual message sent");
                Ok(())
            }
            Err(err) => {
                warn!(%company_id, error = ?err, "whatsapp: manual message failed");
                Err(WhatsAppError::Internal(err))
            }
        }
    }

    async fn instance_dto(&self, company_id: Uuid) -> Result<WhatsAppInstanceDto, WhatsAppError> {
        let instance = self
            .instance_repo
            .find_by_company(company_id)
            .await
            .map_err(WhatsAppError::Internal)?
            .ok_or(WhatsAppError::InstanceNotFound)?;

        Ok(WhatsAppInstanceDto::from(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{
        entities::whatsapp_instances::WhatsAppInstanceEntity,
        repositories::{
            whatsapp_instances::MockWhatsAppInstanceRepository,
            whatsapp_logs::MockWhatsAppLogRepository,
        },
    };
    use messaging::MockWhatsAppGateway;
    use mockall::predicate::eq;

    fn sample_instance(company_id: Uuid, status: WhatsAppStatus) -> WhatsAppInstanceEntity {
        let now = Utc::now();
        WhatsAppInstanceEntity {
            id: Uuid::new_v4(),
            company_id,
            instance_id: "inst-1".to_string(),
            instance_token: "tok-1".to_string(),
            status: status.to_string(),
            qr_code: Some("qr-data".to_string()),
            connected_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn send_message_requires_connected_instance() {
        let company_id = Uuid::new_v4();

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move {
                Ok(Some(sample_instance(cid, WhatsAppStatus::Connecting)))
            })
        });

        let usecase = WhatsAppUseCase::new(
            Arc::new(instance_repo),
            Arc::new(MockWhatsAppLogRepository::new()),
            Arc::new(MockWhatsAppGateway::new()),
        );

        let result = usecase
            .send_message(
                company_id,
                SendMessageModel {
                    phone: "5511999990000".to_string(),
                    message: "Oi".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(WhatsAppError::NotConnected)));
    }

    #[tokio::test]
    async fn send_message_records_log_on_success() {
        let company_id = Uuid::new_v4();

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move {
                Ok(Some(sample_instance(cid, WhatsAppStatus::Connected)))
            })
        });

        let mut log_repo = MockWhatsAppLogRepository::new();
        log_repo
            .expect_record()
            .withf(|entity| entity.status == "sent" && entity.error.is_none())
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_send_text()
            .returning(|_, _, _| Box::pin(async { Ok("msg-1".to_string()) }));

        let usecase = WhatsAppUseCase::new(
            Arc::new(instance_repo),
            Arc::new(log_repo),
            Arc::new(whatsapp),
        );

        usecase
            .send_message(
                company_id,
                SendMessageModel {
                    phone: "5511999990000".to_string(),
                    message: "Oi".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_status_clears_qr_code_once_connected() {
        let company_id = Uuid::new_v4();

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move {
                Ok(Some(sample_instance(cid, WhatsAppStatus::Connecting)))
            })
        });
        instance_repo
            .expect_update_status()
            .with(eq(company_id), eq(WhatsAppStatus::Connected), eq(None::<String>))
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_fetch_status()
            .returning(|_| Box::pin(async { Ok(ConnectionState::Connected) }));

        let usecase = WhatsAppUseCase::new(
            Arc::new(instance_repo),
            Arc::new(MockWhatsAppLogRepository::new()),
            Arc::new(whatsapp),
        );

        usecase.refresh_status(company_id).await.unwrap();
    }

    #[tokio::test]
    async fn disconnect_updates_local_state_even_if_provider_fails() {
        let company_id = Uuid::new_v4();

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move {
                Ok(Some(sample_instance(cid, WhatsAppStatus::Connected)))
            })
        });
        instance_repo
            .expect_update_status()
            .with(eq(company_id), eq(WhatsAppStatus::Disconnected), eq(None::<String>))
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_disconnect()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("session already gone")) }));

        let usecase = WhatsAppUseCase::new(
            Arc::new(instance_repo),
            Arc::new(MockWhatsAppLogRepository::new()),
            Arc::new(whatsapp),
        );

        usecase.disconnect(company_id).await.unwrap();
    }
}
