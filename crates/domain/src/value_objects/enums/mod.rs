pub mod billing_methods;
pub mod charge_statuses;
pub mod notification_statuses;
pub mod payment_providers;
pub mod whatsapp_statuses;
