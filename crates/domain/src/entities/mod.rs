pub mod charges;
pub mod clients;
pub mod message_templates;
pub mod notification_history;
pub mod notification_rules;
pub mod payment_gateway_settings;
pub mod wallet_transactions;
pub mod whatsapp_instances;
pub mod whatsapp_logs;
