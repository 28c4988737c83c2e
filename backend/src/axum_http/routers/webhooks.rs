use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use application::{
    gateways::{DefaultGatewayRegistry, GatewayRegistry},
    usecases::reconciliation::{ReconcileOutcome, ReconciliationUseCase},
};
use domain::repositories::{
    charges::ChargeRepository, payment_gateway_settings::PaymentGatewaySettingRepository,
    wallet_transactions::WalletTransactionRepository,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        charges::ChargePostgres, payment_gateway_settings::PaymentGatewaySettingPostgres,
        wallet_transactions::WalletTransactionPostgres,
    },
};

use crate::{axum_http::error_responses::error_response, config::config_model::DotEnvyConfig};

/// The company id travels in the notification URL registered with the
/// provider; the webhook itself carries no tenant information.
#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub company_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MercadoPagoNotification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<NotificationData>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationData {
    pub id: Option<Value>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let gateway_registry = Arc::new(DefaultGatewayRegistry::new(
        config.webhook.public_base_url.clone(),
    ));
    let charge_repo = Arc::new(ChargePostgres::new(Arc::clone(&db_pool)));
    let setting_repo = Arc::new(PaymentGatewaySettingPostgres::new(Arc::clone(&db_pool)));
    let wallet_repo = Arc::new(WalletTransactionPostgres::new(Arc::clone(&db_pool)));
    let reconciliation_usecase =
        ReconciliationUseCase::new(charge_repo, setting_repo, wallet_repo, gateway_registry);

    Router::new()
        .route("/", post(mercado_pago_webhook))
        .with_state(Arc::new(reconciliation_usecase))
}

pub fn outcome_label(outcome: ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Settled => "settled",
        ReconcileOutcome::AlreadyPaid => "already_paid",
        ReconcileOutcome::NotApproved => "not_approved",
        ReconcileOutcome::StillPending => "still_pending",
    }
}

pub fn outcome_status(label: &str) -> Value {
    json!({ "status": label })
}

pub async fn mercado_pago_webhook<C, S, W, G>(
    State(reconciliation_usecase): State<Arc<ReconciliationUseCase<C, S, W, G>>>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    Json(notification): Json<MercadoPagoNotification>,
) -> impl IntoResponse
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    W: WalletTransactionRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    // Mercado Pago also notifies about merchant orders and plans; only
    // payment events settle charges.
    if notification.kind.as_deref() != Some("payment") {
        info!(
            company_id = %query.company_id,
            kind = ?notification.kind,
            "webhooks: ignoring non-payment notification"
        );
        return (StatusCode::OK, Json(outcome_status("ignored"))).into_response();
    }

    let Some(data_id) = notification.data.as_ref().and_then(|data| {
        data.id.as_ref().map(|id| match id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        })
    }) else {
        warn!(company_id = %query.company_id, "webhooks: payment notification without data.id");
        return error_response(
            StatusCode::BAD_REQUEST,
            "notification is missing data.id".to_string(),
        );
    };

    let signature = headers
        .get("x-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let request_id = headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if signature.is_empty() {
        warn!(company_id = %query.company_id, "webhooks: missing x-signature header");
        return error_response(
            StatusCode::UNAUTHORIZED,
            "missing x-signature header".to_string(),
        );
    }

    match reconciliation_usecase
        .handle_mercado_pago_webhook(query.company_id, &data_id, &request_id, &signature)
        .await
    {
        Ok(outcome) => {
            (StatusCode::OK, Json(outcome_status(outcome_label(outcome)))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
