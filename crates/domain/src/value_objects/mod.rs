pub mod charges;
pub mod enums;
pub mod gateway_settings;
pub mod notifications;
pub mod whatsapp;
