use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

use crate::{
    config::NotificationConfig,
    notifications::{Message, NotificationError},
};

/// Delivers a composed report. Implementations open and release their own
/// session per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        config: &NotificationConfig,
        credential: &str,
        recipients: &[String],
        message: &Message,
    ) -> Result<(), NotificationError>;
}

/// SMTP delivery, STARTTLS unless `starttls = no`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotificationError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

pub fn build_email(
    config: &NotificationConfig,
    recipients: &[String],
    message: &Message,
) -> Result<Email, NotificationError> {
    let mut builder = Email::builder()
        .from(parse_mailbox(&config.user)?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for r in recipients {
        builder = builder.to(parse_mailbox(r)?);
    }
    builder
        .body(message.body.clone())
        .map_err(|e| NotificationError::Transport(e.to_string()))
}

#[async_trait]
impl Transport for SmtpMailer {
    async fn send(
        &self,
        config: &NotificationConfig,
        credential: &str,
        recipients: &[String],
        message: &Message,
    ) -> Result<(), NotificationError> {
        let email = build_email(config, recipients, message)?;
        debug!("Email Message: \n{}", String::from_utf8_lossy(&email.formatted()));

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .map_err(|e| NotificationError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };
        let mailer = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), credential.to_string()))
            .timeout(config.timeout.map(Duration::from_secs))
            .build();

        // Without a connection pool the session is closed once `send` returns,
        // whether it succeeded or not.
        mailer
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| NotificationError::Transport(e.to_string()))
    }
}

/// Resolves recipients and the credential, then hands the report over to a
/// [`Transport`].
pub struct Notifier<'a> {
    config: &'a NotificationConfig,
    transport: &'a dyn Transport,
}

impl<'a> Notifier<'a> {
    pub fn new(config: &'a NotificationConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    pub async fn deliver(&self, message: &Message) -> Result<(), NotificationError> {
        let recipients = self.config.recipients.resolve();
        debug!("Recipients: {}", recipients.join(","));

        let credential = std::env::var(&self.config.credential_env)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NotificationError::MissingCredential(self.config.credential_env.clone()))?;

        self.transport
            .send(self.config, &credential, &recipients, message)
            .await?;
        info!("Successfully sent email");
        Ok(())
    }
}
