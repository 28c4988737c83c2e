use application::usecases::notifications::NotificationEngine;
use infra::postgres::repositories::{
    charges::ChargePostgres, message_templates::MessageTemplatePostgres,
    notification_history::NotificationHistoryPostgres, notification_rules::NotificationRulePostgres,
    whatsapp_instances::WhatsAppInstancePostgres,
};
use messaging::w_api::WApiClient;

pub mod axum_http;
pub mod config;
pub mod services;

/// The engine wired to its production dependencies. Tests exercise the
/// generic engine with mocks; the worker always runs this shape.
pub type PostgresNotificationEngine = NotificationEngine<
    ChargePostgres,
    NotificationRulePostgres,
    MessageTemplatePostgres,
    NotificationHistoryPostgres,
    WhatsAppInstancePostgres,
    WApiClient,
>;
