use crate::carrier::CarrierRecord;
use crate::email_client::Mailer;
use crate::formatter::EmailMessage;
use crate::validation::ValidatedEmail;
use tracing::instrument;

#[derive(Debug)]
pub enum SendOutcome {
    Sent { email: String },
    Failed { email: String, error: anyhow::Error },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub attempted: usize,
    pub sent: usize,
    pub outcomes: Vec<SendOutcome>,
}

impl DispatchReport {
    pub fn failed(&self) -> usize {
        self.attempted - self.sent
    }
}

/// Sends `message` to every carrier in order, one at a time. A failure for
/// one recipient is logged and does not stop the others; nothing is retried.
#[instrument(name = "dispatching emails", skip_all, fields(recipients = carriers.len()))]
pub async fn dispatch(
    mailer: &dyn Mailer,
    carriers: &[CarrierRecord],
    message: &EmailMessage,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for carrier in carriers {
        report.attempted += 1;
        match send_one(mailer, carrier, message).await {
            Ok(()) => {
                report.sent += 1;
                tracing::info!(
                    count = report.sent,
                    recipient = %carrier.email,
                    "{} email(s) sent to {}",
                    report.sent,
                    carrier.email
                );
                report.outcomes.push(SendOutcome::Sent {
                    email: carrier.email.clone(),
                });
            }
            Err(error) => {
                let detail = format!("{error:#}");
                tracing::error!(
                    row = carrier.row,
                    recipient = %carrier.email,
                    error = %detail,
                    "error sending email to {}",
                    carrier.email
                );
                report.outcomes.push(SendOutcome::Failed {
                    email: carrier.email.clone(),
                    error,
                });
            }
        }
    }
    report
}

async fn send_one(
    mailer: &dyn Mailer,
    carrier: &CarrierRecord,
    message: &EmailMessage,
) -> anyhow::Result<()> {
    let recipient = ValidatedEmail::parse(&carrier.email)?;
    mailer
        .send_email(&recipient, &message.subject, &message.body)
        .await
}
