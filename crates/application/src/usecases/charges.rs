use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    documents::validate_document,
    entities::charges::InsertChargeEntity,
    repositories::{
        charges::ChargeRepository, payment_gateway_settings::PaymentGatewaySettingRepository,
    },
    value_objects::{
        charges::{ChargeDto, InsertChargeModel, ListChargesFilter},
        enums::charge_statuses::ChargeStatus,
    },
};
use payments::CreateChargeRequest;

use crate::gateways::GatewayRegistry;

#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("invalid customer document")]
    InvalidDocument,
    #[error("charge amount must be positive")]
    InvalidAmount,
    #[error("due date cannot be in the past")]
    DueDateInPast,
    #[error("charge not found")]
    NotFound,
    #[error("only pending charges can be cancelled, current status: {0}")]
    NotCancellable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ChargeError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ChargeError::InvalidDocument
            | ChargeError::InvalidAmount
            | ChargeError::DueDateInPast => StatusCode::BAD_REQUEST,
            ChargeError::NotFound => StatusCode::NOT_FOUND,
            ChargeError::NotCancellable(_) => StatusCode::CONFLICT,
            ChargeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ChargeResult<T> = std::result::Result<T, ChargeError>;

pub struct ChargeUseCase<C, S, G>
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    charge_repo: Arc<C>,
    setting_repo: Arc<S>,
    gateway_registry: Arc<G>,
}

impl<C, S, G> ChargeUseCase<C, S, G>
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    pub fn new(charge_repo: Arc<C>, setting_repo: Arc<S>, gateway_registry: Arc<G>) -> Self {
        Self {
            charge_repo,
            setting_repo,
            gateway_registry,
        }
    }

    pub async fn create_charge(
        &self,
        company_id: Uuid,
        model: InsertChargeModel,
    ) -> ChargeResult<ChargeDto> {
        info!(
            %company_id,
            amount_minor = model.amount_minor,
            due_date = %model.due_date,
            billing_method = %model.billing_method,
            "charges: create requested"
        );

        if !validate_document(&model.customer_document) {
            warn!(%company_id, "charges: rejected invalid customer document");
            return Err(ChargeError::InvalidDocument);
        }
        if model.amount_minor <= 0 {
            warn!(
                %company_id,
                amount_minor = model.amount_minor,
                "charges: rejected non-positive amount"
            );
            return Err(ChargeError::InvalidAmount);
        }
        // Same clock as the notification loop, so a charge created late at
        // night is judged against the same "today" the reminders use.
        if model.due_date < Local::now().date_naive() {
            warn!(%company_id, due_date = %model.due_date, "charges: rejected past due date");
            return Err(ChargeError::DueDateInPast);
        }

        let insert_entity = InsertChargeEntity {
            company_id,
            client_id: model.client_id,
            customer_name: model.customer_name.clone(),
            customer_document: model.customer_document.clone(),
            customer_phone: model.customer_phone.clone(),
            description: model.description.clone(),
            amount_minor: model.amount_minor,
            due_date: model.due_date,
            status: ChargeStatus::Pending.to_string(),
        };

        let charge_id = self.charge_repo.create(insert_entity).await.map_err(|err| {
            error!(%company_id, db_error = ?err, "charges: failed to insert charge");
            ChargeError::Internal(err)
        })?;

        info!(%company_id, %charge_id, "charges: charge created");

        // A failing provider must not lose the charge; the link can be
        // retried later by re-running the default gateway.
        if let Err(err) = self
            .attach_link_via_default_gateway(company_id, charge_id, &model)
            .await
        {
            warn!(
                %company_id,
                %charge_id,
                error = ?err,
                "charges: charge saved without a payment link"
            );
        }

        let charge = self
            .charge_repo
            .find_by_id_and_company(charge_id, company_id)
            .await
            .map_err(ChargeError::Internal)?
            .ok_or(ChargeError::NotFound)?;

        Ok(ChargeDto::from(charge))
    }

    async fn attach_link_via_default_gateway(
        &self,
        company_id: Uuid,
        charge_id: Uuid,
        model: &InsertChargeModel,
    ) -> anyhow::Result<()> {
        let Some(setting) = self.setting_repo.find_default(company_id).await? else {
            info!(%company_id, %charge_id, "charges: no default gateway configured");
            return Ok(());
        };
        if !setting.is_enabled {
            warn!(
                %company_id,
                %charge_id,
                provider = %setting.provider,
                "charges: default gateway is disabled"
            );
            return Ok(());
        }

        let gateway = self.gateway_registry.payment_gateway(&setting)?;
        let provider = gateway.provider();

        let session = gateway
            .create_charge(CreateChargeRequest {
                charge_id,
                company_id,
                customer_name: model.customer_name.clone(),
                customer_document: model.customer_document.clone(),
                description: model
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Cobranca {charge_id}")),
                amount_minor: i64::from(model.amount_minor),
                due_date: model.due_date,
                billing_method: model.billing_method,
            })
            .await?;

        self.charge_repo
            .attach_payment_link(
                charge_id,
                provider.to_string(),
                session.provider_charge_id,
                session.payment_link,
            )
            .await?;

        info!(%company_id, %charge_id, provider = %provider, "charges: payment link attached");
        Ok(())
    }

    pub async fn list_charges(
        &self,
        company_id: Uuid,
        filter: ListChargesFilter,
    ) -> ChargeResult<Vec<ChargeDto>> {
        let charges = self
            .charge_repo
            .list_by_company(company_id, filter.status)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "charges: failed to list charges");
                ChargeError::Internal(err)
            })?;

        Ok(charges.into_iter().map(ChargeDto::from).collect())
    }

    pub async fn get_charge(&self, company_id: Uuid, charge_id: Uuid) -> ChargeResult<ChargeDto> {
        let charge = self
            .charge_repo
            .find_by_id_and_company(charge_id, company_id)
            .await
            .map_err(|err| {
                error!(%company_id, %charge_id, db_error = ?err, "charges: failed to load charge");
                ChargeError::Internal(err)
            })?
            .ok_or(ChargeError::NotFound)?;

        Ok(ChargeDto::from(charge))
    }

    pub async fn cancel_charge(&self, company_id: Uuid, charge_id: Uuid) -> ChargeResult<()> {
        let charge = self
            .charge_repo
            .find_by_id_and_company(charge_id, company_id)
            .await
            .map_err(ChargeError::Internal)?
            .ok_or(ChargeError::NotFound)?;

        let status = ChargeStatus::from_str(&charge.status).unwrap_or_default();
        if !matches!(status, ChargeStatus::Pending | ChargeStatus::Overdue) {
            warn!(
                %company_id,
                %charge_id,
                status = %charge.status,
                "charges: cancel rejected for settled charge"
            );
            return Err(ChargeError::NotCancellable(charge.status));
        }

        self.charge_repo
            .update_status(charge_id, ChargeStatus::Cancelled)
            .await
            .map_err(|err| {
                error!(%company_id, %charge_id, db_error = ?err, "charges: failed to cancel charge");
                ChargeError::Internal(err)
            })?;

        info!(%company_id, %charge_id, "charges: charge cancelled");
        Ok(())
    }
}
