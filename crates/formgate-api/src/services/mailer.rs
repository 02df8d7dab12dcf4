//! Outbound email.
//!
//! The gate dispatches through the `Mailer` trait so tests can record sends
//! instead of talking to a relay. `SmtpMailer` is the production
//! implementation; `LogMailer` stands in when SMTP is disabled (development)
//! and only logs what it would have sent.

use async_trait::async_trait;
use formgate_core::Config;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;

/// SMTP sends that outlive this are abandoned and reported as failures.
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message build failed: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("Send timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
    pub attachments: Vec<EmailAttachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Production mailer over an async SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        let from = mailbox(&config.email_from_name, &config.email_from_address)
            .map_err(|e| anyhow::anyhow!("Invalid sender address: {}", e))?;

        Ok(SmtpMailer {
            transport,
            from,
            timeout: SEND_TIMEOUT,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::Address(email.to.clone()))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject);

        if let Some(reply_to) = &email.reply_to {
            let reply_to: Mailbox = reply_to
                .parse()
                .map_err(|_| MailError::Address(reply_to.clone()))?;
            builder = builder.reply_to(reply_to);
        }

        let html_part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone());

        let message = if email.attachments.is_empty() {
            builder.singlepart(html_part)
        } else {
            let mut multipart = MultiPart::mixed().singlepart(html_part);
            for attachment in &email.attachments {
                let content_type = ContentType::parse(&attachment.content_type)
                    .or_else(|_| ContentType::parse("application/octet-stream"))
                    .map_err(|e| MailError::Build(e.to_string()))?;
                multipart = multipart.singlepart(
                    Attachment::new(attachment.filename.clone())
                        .body(attachment.data.clone(), content_type),
                );
            }
            builder.multipart(multipart)
        }
        .map_err(|e| MailError::Build(e.to_string()))?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let to = email.to.clone();
        let subject = email.subject.clone();
        let message = self.build_message(&email)?;

        let start = std::time::Instant::now();
        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => {
                tracing::info!(
                    to = %to,
                    subject = %subject,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Email sent"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(to = %to, error = %e, "SMTP send failed");
                Err(MailError::Transport(e.to_string()))
            }
            Err(_) => {
                tracing::error!(to = %to, timeout = ?self.timeout, "SMTP send timed out");
                Err(MailError::Timeout(self.timeout))
            }
        }
    }
}

/// Development mailer: logs the send and succeeds.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "SMTP disabled; email logged instead of sent"
        );
        Ok(())
    }
}

fn mailbox(name: &str, address: &str) -> Result<Mailbox, MailError> {
    let address: Address = address
        .parse()
        .map_err(|_| MailError::Address(address.to_string()))?;
    let name = if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    };
    Ok(Mailbox::new(name, address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_parses_name_and_address() {
        let mb = mailbox("Website", "noreply@example.com").unwrap();
        assert_eq!(mb.name.as_deref(), Some("Website"));
        assert_eq!(mb.email.to_string(), "noreply@example.com");
    }

    #[test]
    fn invalid_address_is_rejected() {
        assert!(matches!(
            mailbox("x", "not-an-address"),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let result = LogMailer
            .send(OutgoingEmail {
                to: "info@example.com".to_string(),
                subject: "Test".to_string(),
                html_body: "<p>hi</p>".to_string(),
                reply_to: None,
                attachments: vec![],
            })
            .await;
        assert!(result.is_ok());
    }
}
