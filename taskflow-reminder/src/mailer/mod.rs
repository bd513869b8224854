/// Mail transport abstraction
///
/// The scheduler only knows how to hand a [`DigestEmail`] to a
/// [`Mailer`]; what happens after that is the transport's business.
/// Two implementations:
///
/// - [`SmtpMailer`]: real delivery over SMTP (lettre)
/// - [`MockMailer`]: records messages in memory, for tests

mod mock;
mod smtp;

pub use mock::MockMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

use async_trait::async_trait;

/// Error type for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Recipient or sender address could not be parsed
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The transport refused or failed to deliver
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// A composed digest ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEmail {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Something that can deliver a digest email
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Transport name, for logging
    fn name(&self) -> &str;

    /// Delivers one email
    async fn send(&self, email: &DigestEmail) -> Result<(), MailerError>;
}
