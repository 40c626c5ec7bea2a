//! Collaboration notices.
//!
//! Submitting a collaboration post enqueues a [`CollaborationNotice`]; the
//! notification worker renders it with a [`NoticeTemplate`] and hands it to a
//! mail transport after the HTTP response has been produced. Delivery is
//! best effort: a full queue or a failed send is logged and counted, never
//! retried, and never reported to the caller.

use mongodb::bson::{Bson, Document};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{config::MailConfig, services::mail::MailMessage};

const SUBJECT: &str = "New Post Submitted by User";
const MISSING: &str = "(not provided)";

/// The parts of a collaboration post included in the notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaborationNotice {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl CollaborationNotice {
    pub fn from_document(post: &Document) -> Self {
        Self {
            name: text_field(post, "name"),
            email: text_field(post, "email"),
            message: text_field(post, "message"),
        }
    }
}

fn text_field(doc: &Document, key: &str) -> Option<String> {
    match doc.get(key)? {
        Bson::String(s) => Some(s.clone()),
        Bson::Null => None,
        other => Some(other.to_string()),
    }
}

/// Addresses and wording of the notice mail.
#[derive(Debug, Clone)]
pub struct NoticeTemplate {
    pub from: String,
    pub to: String,
    pub greeting: String,
    pub signature: String,
}

impl NoticeTemplate {
    /// Returns `None` when the sender or recipient is not configured.
    pub fn from_config(config: &MailConfig) -> Option<Self> {
        Some(Self {
            from: config.sender()?.to_string(),
            to: config.notify_to.clone()?,
            greeting: config
                .notify_name
                .clone()
                .unwrap_or_else(|| "there".to_string()),
            signature: config.signature.clone(),
        })
    }

    pub fn render(&self, notice: &CollaborationNotice) -> MailMessage {
        let body = format!(
            "Hi {greeting},\n\
             \n\
             A new post has been submitted by a user. Here are the details:\n\
             \n\
             ----------------------------------------\n\
             Name: {name}\n\
             Email: {email}\n\
             Message: {message}\n\
             ----------------------------------------\n\
             \n\
             Please follow up with the user as needed.\n\
             \n\
             Thank you,\n\
             {signature}\n",
            greeting = self.greeting,
            name = notice.name.as_deref().unwrap_or(MISSING),
            email = notice.email.as_deref().unwrap_or(MISSING),
            message = notice.message.as_deref().unwrap_or(MISSING),
            signature = self.signature,
        );

        MailMessage {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: SUBJECT.to_string(),
            body,
        }
    }
}

/// Handle used by request handlers to enqueue notices.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Option<mpsc::Sender<CollaborationNotice>>,
}

impl Notifier {
    pub fn new(sender: mpsc::Sender<CollaborationNotice>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A notifier that discards every notice.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Enqueues `notice` without waiting.
    pub fn notify(&self, notice: CollaborationNotice) {
        let Some(sender) = &self.sender else {
            crate::metrics::NOTIFICATIONS_TOTAL
                .with_label_values(&["disabled"])
                .inc();
            return;
        };

        match sender.try_send(notice) {
            Ok(()) => crate::metrics::NOTIFICATION_QUEUE_DEPTH.inc(),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Notification queue full, dropping collaboration notice");
                crate::metrics::NOTIFICATIONS_TOTAL
                    .with_label_values(&["dropped"])
                    .inc();
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Notification worker stopped, dropping collaboration notice");
                crate::metrics::NOTIFICATIONS_TOTAL
                    .with_label_values(&["dropped"])
                    .inc();
            }
        }
    }
}
