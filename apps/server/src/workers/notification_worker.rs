//! Mail delivery worker for collaboration notices

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::services::{
    mail::MailTransport,
    notification::{CollaborationNotice, NoticeTemplate, Notifier},
};

pub struct NotificationWorker {
    receiver: mpsc::Receiver<CollaborationNotice>,
    transport: Arc<dyn MailTransport>,
    template: NoticeTemplate,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<CollaborationNotice>,
        transport: Arc<dyn MailTransport>,
        template: NoticeTemplate,
    ) -> Self {
        Self {
            receiver,
            transport,
            template,
        }
    }

    /// Delivers notices until every [`Notifier`] has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(notice) = self.receiver.recv().await {
            crate::metrics::NOTIFICATION_QUEUE_DEPTH.dec();
            let message = self.template.render(&notice);

            match self.transport.send(message).await {
                Ok(()) => {
                    tracing::info!(to = %self.template.to, "Collaboration notice sent");
                    crate::metrics::NOTIFICATIONS_TOTAL
                        .with_label_values(&["sent"])
                        .inc();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to send collaboration notice");
                    crate::metrics::NOTIFICATIONS_TOTAL
                        .with_label_values(&["failed"])
                        .inc();
                }
            }
        }

        tracing::info!("Notification worker stopped");
    }
}

/// Spawns a worker draining a queue of `capacity` notices.
pub fn spawn_notification_worker(
    transport: Arc<dyn MailTransport>,
    template: NoticeTemplate,
    capacity: usize,
) -> (Notifier, JoinHandle<()>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let worker = NotificationWorker::new(receiver, transport, template);
    let handle = tokio::spawn(worker.run());
    (Notifier::new(sender), handle)
}
