use anyhow::Result;

use super::config_model::{Database, DotEnvyConfig, Scheduler, WhatsApp, WorkerServer};

const DEFAULT_TICK_SECONDS: u64 = 300;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")?.parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")?.parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")?.parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL")?,
    };

    let scheduler = Scheduler {
        tick_seconds: match std::env::var("WORKER_TICK_SECONDS") {
            Ok(raw) => raw.parse()?,
            Err(_) => DEFAULT_TICK_SECONDS,
        },
    };

    let whatsapp = WhatsApp {
        api_base_url: std::env::var("WAPI_BASE_URL")?,
        admin_token: std::env::var("WAPI_ADMIN_TOKEN")?,
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        scheduler,
        whatsapp,
    })
}
