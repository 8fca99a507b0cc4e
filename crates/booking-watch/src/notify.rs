//! Delivery of found dates: email when SMTP is configured, otherwise a log line.

use anyhow::Context;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::collections::BTreeSet;

use crate::config::{required, Settings};
use crate::error::{WatchError, WatchResult};

const DATES_PLACEHOLDER: &str = "{dates}";

/// Insert the sorted dates into a body template.
pub fn render_body(template: &str, dates: &BTreeSet<String>) -> String {
    let joined = dates.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    template.replace(DATES_PLACEHOLDER, &joined)
}

/// SMTP delivery settings, checked when a message is sent
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    settings: Settings,
}

impl EmailNotifier {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn build_message(&self, dates: &BTreeSet<String>) -> WatchResult<Message> {
        let s = &self.settings;
        let from: Mailbox = required(&s.email_from, "EMAIL_FROM")?
            .parse()
            .context("Invalid EMAIL_FROM address")
            .map_err(WatchError::notify)?;
        let to: Mailbox = required(&s.email_to, "EMAIL_TO")?
            .parse()
            .context("Invalid EMAIL_TO address")
            .map_err(WatchError::notify)?;
        let subject = required(&s.email_subject, "EMAIL_SUBJECT")?;
        let body = render_body(required(&s.email_body, "EMAIL_BODY")?, dates);

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body),
                ),
            )
            .context("Failed to build email message")
            .map_err(WatchError::notify)
    }

    fn transport(&self) -> WatchResult<AsyncSmtpTransport<Tokio1Executor>> {
        let s = &self.settings;
        let server = required(&s.email_smtp_server, "EMAIL_SMTP_SERVER")?;
        let port: u16 = required(&s.email_smtp_port, "EMAIL_SMTP_PORT")?
            .trim()
            .parse()
            .context("EMAIL_SMTP_PORT must be a valid port number")
            .map_err(WatchError::notify)?;
        let credentials = Credentials::new(
            required(&s.email_username, "EMAIL_USERNAME")?.to_string(),
            required(&s.email_password, "EMAIL_PASSWORD")?.to_string(),
        );

        // STARTTLS is required; the connection is closed with QUIT after the send
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
            .context("Failed to configure SMTP relay")
            .map_err(WatchError::notify)?
            .port(port)
            .credentials(credentials)
            .build();

        Ok(transport)
    }

    pub async fn send(&self, dates: &BTreeSet<String>) -> WatchResult<()> {
        let message = self.build_message(dates)?;
        let transport = self.transport()?;

        transport
            .send(message)
            .await
            .context("SMTP send failed")
            .map_err(WatchError::notify)?;

        tracing::info!("Notification email sent for {} dates", dates.len());
        Ok(())
    }
}

/// The channel a run reports through, picked once from settings
#[derive(Debug, Clone)]
pub enum Notifier {
    Email(EmailNotifier),
    /// Static text, logged as is
    LogMessage(String),
    Silent,
}

impl Notifier {
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.is_email() {
            Notifier::Email(EmailNotifier::new(settings.clone()))
        } else if settings.is_log_message() {
            Notifier::LogMessage(settings.dates_found_log_message.clone().unwrap_or_default())
        } else {
            Notifier::Silent
        }
    }

    pub async fn notify(&self, dates: &BTreeSet<String>) -> WatchResult<()> {
        match self {
            Notifier::Email(email) => email.send(dates).await.inspect_err(|e| {
                tracing::error!("An error occurred while sending the email: {:?}", e);
            }),
            Notifier::LogMessage(message) => {
                tracing::info!("{}", message);
                Ok(())
            }
            Notifier::Silent => Ok(()),
        }
    }
}
