pub mod mailer;
pub mod notifications;
pub mod partners;
pub mod registry;

pub use mailer::Mailer;
pub use registry::NotificationRegistry;
