use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use application::usecases::notification_rules::{InsertTemplateModel, NotificationRuleUseCase};
use domain::{
    repositories::{
        message_templates::MessageTemplateRepository,
        notification_history::NotificationHistoryRepository,
        notification_rules::NotificationRuleRepository,
    },
    value_objects::notifications::InsertNotificationRuleModel,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        message_templates::MessageTemplatePostgres,
        notification_history::NotificationHistoryPostgres,
        notification_rules::NotificationRulePostgres,
    },
};

use crate::{auth::AuthCompany, axum_http::error_responses::error_response};

#[derive(Debug, Deserialize)]
pub struct ToggleRuleModel {
    pub is_active: bool,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let template_repository = MessageTemplatePostgres::new(Arc::clone(&db_pool));
    let rule_repository = NotificationRulePostgres::new(Arc::clone(&db_pool));
    let history_repository = NotificationHistoryPostgres::new(Arc::clone(&db_pool));
    let notifications_usecase = NotificationRuleUseCase::new(
        Arc::new(template_repository),
        Arc::new(rule_repository),
        Arc::new(history_repository),
    );

    Router::new()
        .route("/templates", post(create_template).get(list_templates))
        .route("/rules", post(create_rule).get(list_rules))
        .route("/rules/:rule_id", patch(toggle_rule))
        .route("/history", get(list_history))
        .with_state(Arc::new(notifications_usecase))
}

pub async fn create_template<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
    Json(insert_template_model): Json<InsertTemplateModel>,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase
        .create_template(auth.company_id, insert_template_model)
        .await
    {
        Ok(template_id) => (StatusCode::CREATED, Json(json!({ "id": template_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_templates<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase.list_templates(auth.company_id).await {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn create_rule<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
    Json(insert_rule_model): Json<InsertNotificationRuleModel>,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase
        .create_rule(auth.company_id, insert_rule_model)
        .await
    {
        Ok(rule_id) => (StatusCode::CREATED, Json(json!({ "id": rule_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_rules<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase.list_rules(auth.company_id).await {
        Ok(rules) => (StatusCode::OK, Json(rules)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn toggle_rule<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
    Path(rule_id): Path<Uuid>,
    Json(toggle_model): Json<ToggleRuleModel>,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase
        .set_rule_active(auth.company_id, rule_id, toggle_model.is_active)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_history<T, R, H>(
    State(notifications_usecase): State<Arc<NotificationRuleUseCase<T, R, H>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    match notifications_usecase.list_history(auth.company_id).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
