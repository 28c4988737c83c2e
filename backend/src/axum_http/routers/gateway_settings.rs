use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use application::usecases::gateway_settings::GatewaySettingUseCase;
use domain::{
    repositories::payment_gateway_settings::PaymentGatewaySettingRepository,
    value_objects::{
        enums::payment_providers::PaymentProvider, gateway_settings::UpsertGatewaySettingModel,
    },
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::payment_gateway_settings::PaymentGatewaySettingPostgres,
};

use crate::{auth::AuthCompany, axum_http::error_responses::error_response};

#[derive(Debug, Deserialize)]
pub struct SetDefaultModel {
    pub provider: PaymentProvider,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let setting_repository = PaymentGatewaySettingPostgres::new(Arc::clone(&db_pool));
    let gateway_settings_usecase = GatewaySettingUseCase::new(Arc::new(setting_repository));

    Router::new()
        .route("/", put(upsert_setting).get(list_settings))
        .route("/default", post(set_default))
        .with_state(Arc::new(gateway_settings_usecase))
}

pub async fn upsert_setting<S>(
    State(gateway_settings_usecase): State<Arc<GatewaySettingUseCase<S>>>,
    auth: AuthCompany,
    Json(upsert_model): Json<UpsertGatewaySettingModel>,
) -> impl IntoResponse
where
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
{
    match gateway_settings_usecase
        .upsert_setting(auth.company_id, upsert_model)
        .await
    {
        Ok(setting_id) => (StatusCode::OK, Json(json!({ "id": setting_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_settings<S>(
    State(gateway_settings_usecase): State<Arc<GatewaySettingUseCase<S>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
{
    match gateway_settings_usecase.list_settings(auth.company_id).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn set_default<S>(
    State(gateway_settings_usecase): State<Arc<GatewaySettingUseCase<S>>>,
    auth: AuthCompany,
    Json(set_default_model): Json<SetDefaultModel>,
) -> impl IntoResponse
where
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
{
    match gateway_settings_usecase
        .set_default(auth.company_id, set_default_model.provider)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
