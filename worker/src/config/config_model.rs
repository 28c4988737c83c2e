#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub scheduler: Scheduler,
    pub whatsapp: WhatsApp,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    pub timeout: u64,
    pub body_limit: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    pub tick_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct WhatsApp {
    pub api_base_url: String,
    pub admin_token: String,
}
