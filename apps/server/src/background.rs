//! Background tasks started alongside the HTTP server

use std::sync::Arc;

use crate::{
    config::MailConfig,
    services::{
        mail::SmtpMailer,
        notification::{NoticeTemplate, Notifier},
    },
    workers::spawn_notification_worker,
    Error, Result,
};

/// Starts the notification worker when mail is enabled.
///
/// The worker runs until the returned [`Notifier`] and all its clones are
/// dropped.
pub fn start_notifications(config: &MailConfig) -> Result<Notifier> {
    if !config.enabled {
        tracing::info!("Mail notifications disabled");
        return Ok(Notifier::disabled());
    }

    let template = NoticeTemplate::from_config(config)
        .ok_or_else(|| Error::Mail("mail sender and recipient must be configured".into()))?;
    let transport = Arc::new(SmtpMailer::from_config(config)?);
    let (notifier, _handle) =
        spawn_notification_worker(transport, template, config.queue_capacity);

    tracing::info!(
        relay = %config.smtp_host,
        queue_capacity = config.queue_capacity,
        "Mail notifications enabled"
    );

    Ok(notifier)
}
