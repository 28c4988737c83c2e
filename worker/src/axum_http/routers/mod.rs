pub mod notification_tick;
