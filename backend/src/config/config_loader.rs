use anyhow::Result;

use super::{config_model::DotEnvyConfig, stage::Stage};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT_BACKEND")?.parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")?.parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")?.parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL")?,
    };

    let auth = super::config_model::Auth {
        jwt_secret: std::env::var("JWT_SECRET")?,
    };

    let webhook = super::config_model::Webhook {
        public_base_url: std::env::var("PUBLIC_BASE_URL")?,
    };

    let whatsapp = super::config_model::WhatsApp {
        api_base_url: std::env::var("WAPI_BASE_URL")?,
        admin_token: std::env::var("WAPI_ADMIN_TOKEN")?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        webhook,
        whatsapp,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    Ok(std::env::var("JWT_SECRET")?)
}
