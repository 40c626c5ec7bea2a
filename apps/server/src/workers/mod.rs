//! Background workers for asynchronous processing

mod notification_worker;

pub use notification_worker::{spawn_notification_worker, NotificationWorker};
