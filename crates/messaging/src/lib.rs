use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod w_api;

/// Per-tenant credentials handed out when an instance is provisioned.
#[derive(Debug, Clone)]
pub struct InstanceCredentials {
    pub instance_id: String,
    pub instance_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[async_trait]
#[automock]
pub trait WhatsAppGateway: Send + Sync {
    async fn create_instance(&self, instance_name: &str) -> Result<InstanceCredentials>;
    async fn fetch_qr_code(&self, credentials: &InstanceCredentials) -> Result<Option<String>>;
    async fn fetch_status(&self, credentials: &InstanceCredentials) -> Result<ConnectionState>;
    async fn disconnect(&self, credentials: &InstanceCredentials) -> Result<()>;
    async fn send_text(
        &self,
        credentials: &InstanceCredentials,
        phone: &str,
        message: &str,
    ) -> Result<String>;
}
