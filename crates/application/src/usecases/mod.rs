pub mod charges;
pub mod clients;
pub mod gateway_settings;
pub mod notification_rules;
pub mod notifications;
pub mod reconciliation;
pub mod whatsapp;
