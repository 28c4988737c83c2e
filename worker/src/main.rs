use anyhow::Result;
use application::usecases::notifications::NotificationEngine;
use infra::postgres::{
    postgres_connection,
    repositories::{
        charges::ChargePostgres, message_templates::MessageTemplatePostgres,
        notification_history::NotificationHistoryPostgres,
        notification_rules::NotificationRulePostgres,
        whatsapp_instances::WhatsAppInstancePostgres,
    },
};
use messaging::w_api::WApiClient;
use std::sync::Arc;
use tracing::{error, info};
use worker::{axum_http, config, services};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let whatsapp_client = Arc::new(WApiClient::new(
        dotenvy_env.whatsapp.api_base_url.clone(),
        dotenvy_env.whatsapp.admin_token.clone(),
    ));

    let notification_engine = Arc::new(NotificationEngine::new(
        Arc::new(ChargePostgres::new(Arc::clone(&db_pool_arc))),
        Arc::new(NotificationRulePostgres::new(Arc::clone(&db_pool_arc))),
        Arc::new(MessageTemplatePostgres::new(Arc::clone(&db_pool_arc))),
        Arc::new(NotificationHistoryPostgres::new(Arc::clone(&db_pool_arc))),
        Arc::new(WhatsAppInstancePostgres::new(Arc::clone(&db_pool_arc))),
        whatsapp_client,
    ));

    let tick_seconds = dotenvy_env.scheduler.tick_seconds;
    let notification_loop = tokio::spawn(services::notification_loop::run(
        Arc::clone(&notification_engine),
        tick_seconds,
    ));

    let server_config = Arc::clone(&dotenvy_env);
    let server_engine = Arc::clone(&notification_engine);
    let health_server =
        tokio::spawn(async move { axum_http::http_serve::start(server_config, server_engine).await });

    tokio::select! {
        result = notification_loop => result??,
        result = health_server => result??,
    };
    Ok(())
}
