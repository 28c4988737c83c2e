use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;

use application::usecases::whatsapp::WhatsAppUseCase;
use domain::{
    repositories::{
        whatsapp_instances::WhatsAppInstanceRepository, whatsapp_logs::WhatsAppLogRepository,
    },
    value_objects::whatsapp::SendMessageModel,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        whatsapp_instances::WhatsAppInstancePostgres, whatsapp_logs::WhatsAppLogPostgres,
    },
};
use messaging::{WhatsAppGateway, w_api::WApiClient};

use crate::{
    auth::AuthCompany, axum_http::error_responses::error_response,
    config::config_model::DotEnvyConfig,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let instance_repository = WhatsAppInstancePostgres::new(Arc::clone(&db_pool));
    let log_repository = WhatsAppLogPostgres::new(Arc::clone(&db_pool));
    let whatsapp_client = WApiClient::new(
        config.whatsapp.api_base_url.clone(),
        config.whatsapp.admin_token.clone(),
    );
    let whatsapp_usecase = WhatsAppUseCase::new(
        Arc::new(instance_repository),
        Arc::new(log_repository),
        Arc::new(whatsapp_client),
    );

    Router::new()
        .route("/connect", post(connect))
        .route("/status", get(refresh_status))
        .route("/disconnect", post(disconnect))
        .route("/send", post(send_message))
        .with_state(Arc::new(whatsapp_usecase))
}

pub async fn connect<I, L, W>(
    State(whatsapp_usecase): State<Arc<WhatsAppUseCase<I, L, W>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    match whatsapp_usecase.connect(auth.company_id).await {
        Ok(instance) => (StatusCode::OK, Json(instance)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn refresh_status<I, L, W>(
    State(whatsapp_usecase): State<Arc<WhatsAppUseCase<I, L, W>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    match whatsapp_usecase.refresh_status(auth.company_id).await {
        Ok(instance) => (StatusCode::OK, Json(instance)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn disconnect<I, L, W>(
    State(whatsapp_usecase): State<Arc<WhatsAppUseCase<I, L, W>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    match whatsapp_usecase.disconnect(auth.company_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn send_message<I, L, W>(
    State(whatsapp_usecase): State<Arc<WhatsAppUseCase<I, L, W>>>,
    auth: AuthCompany,
    Json(send_message_model): Json<SendMessageModel>,
) -> impl IntoResponse
where
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    L: WhatsAppLogRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    match whatsapp_usecase
        .send_message(auth.company_id, send_message_model)
        .await
    {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
