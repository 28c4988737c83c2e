#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub webhook: Webhook,
    pub whatsapp: WhatsApp,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

/// Base URL the payment providers call back into, e.g.
/// `https://api.pagoupix.com.br`.
#[derive(Debug, Clone)]
pub struct Webhook {
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct WhatsApp {
    pub api_base_url: String,
    pub admin_token: String,
}
