//! Service layer - business logic over the document store

pub mod catalog;
pub mod collaboration;
pub mod enquiries;
pub mod mail;
pub mod notification;
pub mod users;

pub use catalog::CatalogService;
pub use collaboration::CollaborationService;
pub use enquiries::EnquiryService;
pub use mail::{MailMessage, MailTransport, RecordingMailer, SmtpMailer};
pub use notification::{CollaborationNotice, NoticeTemplate, Notifier};
pub use users::{Role, UserService};
