use crate::configuration::{EmailClientSettings, MailBackend};
use crate::errors::AppError;
use crate::validation::ValidatedEmail;
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// A handle on whatever actually delivers mail. One is built per run and
/// every recipient is sent through it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(
        &self,
        recipient: &ValidatedEmail,
        subject: &str,
        text_content: &str,
    ) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}

pub fn build_mailer(settings: &EmailClientSettings) -> Result<Box<dyn Mailer>, AppError> {
    let mailer: Box<dyn Mailer> = match settings.backend {
        MailBackend::Console => Box::new(ConsoleMailer),
        MailBackend::Http => Box::new(HttpEmailClient::new(
            &settings.base_url,
            sender(settings)?,
            &settings.authorization_token,
            settings.timeout(),
        )?),
        MailBackend::Smtp => Box::new(SmtpMailer::new(
            &settings.smtp_host,
            &settings.smtp_username,
            &settings.smtp_password,
            sender(settings)?,
            settings.timeout(),
        )?),
    };
    tracing::info!(backend = mailer.name(), "mail backend ready");
    Ok(mailer)
}

fn sender(settings: &EmailClientSettings) -> Result<ValidatedEmail, AppError> {
    settings
        .parse_sender()
        .map_err(|e| AppError::Mailer(format!("invalid sender `{}`: {e}", settings.sender_email)))
}

#[derive(Clone, Debug)]
pub struct HttpEmailClient {
    http_client: Client,
    email_server_url: String,
    sender: ValidatedEmail,
    authorization_token: String,
}

#[derive(Serialize, Debug)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

impl HttpEmailClient {
    pub fn new(
        base_url: &str,
        sender: ValidatedEmail,
        authorization_token: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Mailer(e.to_string()))?;
        Ok(Self {
            http_client,
            email_server_url: base_url.trim_end_matches('/').to_string(),
            sender,
            authorization_token: authorization_token.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.email_server_url
    }
}

#[async_trait]
impl Mailer for HttpEmailClient {
    async fn send_email(
        &self,
        recipient: &ValidatedEmail,
        subject: &str,
        text_content: &str,
    ) -> anyhow::Result<()> {
        let url = format!("{}/email", self.email_server_url);
        let request_body = SendEmailRequest {
            from: self.sender.as_str(),
            to: recipient.as_str(),
            subject,
            text_body: text_content,
        };
        self.http_client
            .post(&url)
            .header("X-Postmark-Server-Token", &self.authorization_token)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()
            .context("server returned error")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        username: &str,
        password: &str,
        sender: ValidatedEmail,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let from = sender
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mailer(format!("invalid sender address: {e}")))?;
        let transport = SmtpTransport::relay(host)
            .map_err(|e| AppError::Mailer(format!("failed to create SMTP transport: {e}")))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(timeout))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(
        &self,
        recipient: &ValidatedEmail,
        subject: &str,
        text_content: &str,
    ) -> anyhow::Result<()> {
        let to = recipient
            .as_str()
            .parse::<Mailbox>()
            .context("invalid to address")?;
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text_content.to_string())
            .context("failed to build email")?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await?
            .context("failed to send email")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Prints each email instead of sending it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send_email(
        &self,
        recipient: &ValidatedEmail,
        subject: &str,
        text_content: &str,
    ) -> anyhow::Result<()> {
        println!("To: {}\nSubject: {subject}\n\n{text_content}\n", recipient.as_str());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
