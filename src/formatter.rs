use crate::configuration::MessageSettings;
use crate::errors::RowError;
use crate::load::LoadRecord;
use crate::spreadsheet::Table;
use chrono::NaiveDateTime;

const DATE_FORMAT: &str = "%m/%d/%y";
const TIME_FORMAT: &str = "%H:%M";
const SEPARATOR: &str = "-------------------------";

/// The single message every carrier receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct FormattedLoads {
    pub blocks: Vec<String>,
    pub skipped: Vec<RowError>,
}

pub fn format_block(load: &LoadRecord) -> String {
    format!(
        "Trip: {} | {} → {}\n\
         Pickup: {} {} | Delivery: {} {}\n\
         Weight: {} Lbs | Temp: {} | Stops: {}\n\
         {SEPARATOR}\n",
        load.trip,
        load.origin,
        load.destination,
        load.pickup.format(DATE_FORMAT),
        load.pickup.format(TIME_FORMAT),
        load.delivery.format(DATE_FORMAT),
        load.delivery.format(TIME_FORMAT),
        load.weight,
        load.temperature,
        load.stops,
    )
}

/// One block per well-formed row, in table order. Rows that cannot be
/// read are logged and left out.
pub fn format_loads(table: &Table) -> FormattedLoads {
    let mut formatted = FormattedLoads::default();
    for row in 0..table.len() {
        match LoadRecord::from_row(table, row) {
            Ok(load) => formatted.blocks.push(format_block(&load)),
            Err(e) => {
                tracing::warn!(
                    row = e.row(),
                    cells = %table.describe_row(row),
                    error = %e,
                    "error processing load row, skipping"
                );
                formatted.skipped.push(e);
            }
        }
    }
    formatted
}

pub fn construct_email_body(blocks: &[String], message: &MessageSettings) -> String {
    format!("{}{}{}", message.greeting, blocks.join("\n"), message.sign_off)
}

pub fn subject_line(prefix: &str, now: NaiveDateTime) -> String {
    format!("{prefix} - {}", now.format("%m/%d/%y %H:%M"))
}

impl EmailMessage {
    pub fn compose(blocks: &[String], message: &MessageSettings, now: NaiveDateTime) -> Self {
        Self {
            subject: subject_line(&message.subject_prefix, now),
            body: construct_email_body(blocks, message),
        }
    }
}
