pub mod notification_loop;
