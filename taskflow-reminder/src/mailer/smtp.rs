/// SMTP delivery via lettre
///
/// Uses the async tokio transport with TLS to the configured relay.
/// Credentials and the sender address come from the environment (see
/// the api crate's `Config`).

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{DigestEmail, Mailer, MailerError};

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname (e.g. "smtp.gmail.com")
    pub host: String,

    /// Account username
    pub username: String,

    /// Account password or app token
    pub password: String,

    /// Sender address for every digest
    pub from: String,
}

/// SMTP implementation of [`Mailer`]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the relay transport
    ///
    /// # Errors
    ///
    /// Fails if the relay host is invalid or the sender address does
    /// not parse.
    pub fn new(config: SmtpConfig) -> Result<Self, MailerError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailerError::InvalidAddress(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: &DigestEmail) -> Result<(), MailerError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailerError::InvalidAddress(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        Ok(())
    }
}
