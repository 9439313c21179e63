//! services/api/src/adapters/mailer.rs
//!
//! SMTP adapter implementing the `Mailer` port with `lettre`. Delivery is a
//! single attempt over STARTTLS; a failure is surfaced to the caller and
//! never retried.

use async_trait::async_trait;
use diary_core::ports::{Mailer, PortError, PortResult};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `Mailer` port via an async SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the STARTTLS transport from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, crate::error::ApiError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();

        let from = config
            .mail_from
            .parse::<Mailbox>()
            .map_err(|e| crate::error::ApiError::Internal(format!("Invalid MAIL_FROM: {}", e)))?;

        Ok(Self { transport, from })
    }
}

//=========================================================================================
// `Mailer` Trait Implementation
//=========================================================================================

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(&self, to: &str, confirm_url: &str) -> PortResult<()> {
        let to_mailbox = to
            .parse::<Mailbox>()
            .map_err(|e| PortError::Unexpected(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject("Confirm email")
            .header(ContentType::TEXT_HTML)
            .body(format!(r#"<a href="{}">Confirm email</a>"#, confirm_url))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(())
    }
}
