pub mod charges;
pub mod clients;
pub mod gateway_settings;
pub mod notifications;
pub mod webhooks;
pub mod whatsapp;
