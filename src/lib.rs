pub mod carrier;
pub mod configuration;
pub mod dispatcher;
pub mod email_client;
pub mod errors;
pub mod formatter;
pub mod load;
pub mod spreadsheet;
mod telemetry;
pub mod validation;

use crate::carrier::{CarrierRecord, carriers_from_table};
use crate::configuration::{Settings, get_configuration};
use crate::dispatcher::{DispatchReport, dispatch};
use crate::email_client::{Mailer, build_mailer};
use crate::errors::{AppError, RowError};
use crate::formatter::{EmailMessage, format_loads};
use crate::load::LOAD_COLUMNS;
use crate::spreadsheet::load_table;
use chrono::{Local, NaiveDateTime};
use tracing::instrument;
use uuid::Uuid;

pub use crate::telemetry::{get_subscriber, init_subscriber};

pub async fn run() -> Result<(), AppError> {
    let settings = get_configuration()?;
    init_subscriber(settings.telemetry.filter.clone(), settings.telemetry.json);

    run_with(&settings, Local::now().naive_local())
        .await
        .map(|_| ())
        .inspect_err(|e| tracing::error!(error = %e, "run aborted, no emails were sent"))
}

/// Everything needed to send, built before the first email goes out.
#[derive(Debug)]
pub struct Distribution {
    pub message: EmailMessage,
    pub carriers: Vec<CarrierRecord>,
    pub skipped_rows: Vec<RowError>,
}

/// Reads both lists and builds the message. Both files are read before any
/// formatting so a missing file aborts the run with nothing half-built.
pub fn prepare_distribution(
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<Distribution, AppError> {
    let loads = load_table(&settings.input.load_list)?;
    let carrier_table = load_table(&settings.input.carrier_list)?;

    // a missing load column fails each row on its own; only missing files are fatal
    for column in loads.missing_columns(&LOAD_COLUMNS) {
        tracing::warn!(file = loads.source(), column, "load list has no such column");
    }
    let carriers = carriers_from_table(&carrier_table)?;

    let formatted = format_loads(&loads);
    tracing::info!(
        loads = formatted.blocks.len(),
        skipped = formatted.skipped.len(),
        carriers = carriers.len(),
        "load list formatted"
    );

    Ok(Distribution {
        message: EmailMessage::compose(&formatted.blocks, &settings.message, now),
        carriers,
        skipped_rows: formatted.skipped,
    })
}

#[instrument(name = "distributing load list", skip_all, fields(run_id = %Uuid::new_v4()))]
pub async fn run_with(settings: &Settings, now: NaiveDateTime) -> Result<DispatchReport, AppError> {
    let distribution = prepare_distribution(settings, now)?;
    let mailer = build_mailer(&settings.email_client)?;
    Ok(send_distribution(mailer.as_ref(), &distribution).await)
}

pub async fn send_distribution(mailer: &dyn Mailer, distribution: &Distribution) -> DispatchReport {
    let report = dispatch(mailer, &distribution.carriers, &distribution.message).await;
    if report.failed() > 0 {
        tracing::warn!(
            failed = report.failed(),
            "{} of {} email(s) could not be sent",
            report.failed(),
            report.attempted
        );
    }
    tracing::info!(
        sent = report.sent,
        attempted = report.attempted,
        "All emails sent successfully."
    );
    report
}
