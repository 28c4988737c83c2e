use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use uuid::Uuid;

use application::{
    gateways::{DefaultGatewayRegistry, GatewayRegistry},
    usecases::{charges::ChargeUseCase, reconciliation::ReconciliationUseCase},
};
use domain::{
    repositories::{
        charges::ChargeRepository, payment_gateway_settings::PaymentGatewaySettingRepository,
        wallet_transactions::WalletTransactionRepository,
    },
    value_objects::charges::{InsertChargeModel, ListChargesFilter},
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        charges::ChargePostgres, payment_gateway_settings::PaymentGatewaySettingPostgres,
        wallet_transactions::WalletTransactionPostgres,
    },
};

use crate::{
    auth::AuthCompany,
    axum_http::{
        error_responses::error_response,
        routers::webhooks::{outcome_label, outcome_status},
    },
    config::config_model::DotEnvyConfig,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let gateway_registry = Arc::new(DefaultGatewayRegistry::new(
        config.webhook.public_base_url.clone(),
    ));
    let charge_repo = Arc::new(ChargePostgres::new(Arc::clone(&db_pool)));
    let setting_repo = Arc::new(PaymentGatewaySettingPostgres::new(Arc::clone(&db_pool)));
    let wallet_repo = Arc::new(WalletTransactionPostgres::new(Arc::clone(&db_pool)));

    let charges_usecase = ChargeUseCase::new(
        Arc::clone(&charge_repo),
        Arc::clone(&setting_repo),
        Arc::clone(&gateway_registry),
    );
    let reconciliation_usecase =
        ReconciliationUseCase::new(charge_repo, setting_repo, wallet_repo, gateway_registry);

    Router::new()
        .route("/", post(create_charge).get(list_charges))
        .route("/:charge_id", get(get_charge))
        .route("/:charge_id/cancel", post(cancel_charge))
        .with_state(Arc::new(charges_usecase))
        .merge(
            Router::new()
                .route("/:charge_id/check", post(check_payment))
                .with_state(Arc::new(reconciliation_usecase)),
        )
}

pub async fn create_charge<C, S, G>(
    State(charges_usecase): State<Arc<ChargeUseCase<C, S, G>>>,
    auth: AuthCompany,
    Json(insert_charge_model): Json<InsertChargeModel>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    match charges_usecase
        .create_charge(auth.company_id, insert_charge_model)
        .await
    {
        Ok(charge) => (StatusCode::CREATED, Json(charge)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_charges<C, S, G>(
    State(charges_usecase): State<Arc<ChargeUseCase<C, S, G>>>,
    auth: AuthCompany,
    Query(filter): Query<ListChargesFilter>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    match charges_usecase.list_charges(auth.company_id, filter).await {
        Ok(charges) => (StatusCode::OK, Json(charges)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_charge<C, S, G>(
    State(charges_usecase): State<Arc<ChargeUseCase<C, S, G>>>,
    auth: AuthCompany,
    Path(charge_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    match charges_usecase.get_charge(auth.company_id, charge_id).await {
        Ok(charge) => (StatusCode::OK, Json(charge)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn cancel_charge<C, S, G>(
    State(charges_usecase): State<Arc<ChargeUseCase<C, S, G>>>,
    auth: AuthCompany,
    Path(charge_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    match charges_usecase
        .cancel_charge(auth.company_id, charge_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

/// Manual "did this get paid?" button for charges whose webhook never
/// arrived or whose provider has no webhook at all.
pub async fn check_payment<C, S, W, G>(
    State(reconciliation_usecase): State<Arc<ReconciliationUseCase<C, S, W, G>>>,
    auth: AuthCompany,
    Path(charge_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    W: WalletTransactionRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    match reconciliation_usecase
        .check_payment(auth.company_id, charge_id)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome_status(outcome_label(outcome)))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
