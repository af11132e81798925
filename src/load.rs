use crate::errors::RowError;
use crate::spreadsheet::{Cell, Table};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const TRIP: &str = "Trip";
pub const ORIGIN: &str = "Orig City/St";
pub const DESTINATION: &str = "Dest City/St";
pub const PICKUP_DATE: &str = "Date";
pub const PICKUP_TIME: &str = "Time";
pub const DELIVERY_DATE: &str = "Date_2";
pub const DELIVERY_TIME: &str = "Time_3";
pub const WEIGHT: &str = "Weight";
pub const TEMPERATURE: &str = "Temp";
pub const STOPS: &str = "P/S";

pub const LOAD_COLUMNS: [&str; 10] = [
    TRIP,
    ORIGIN,
    DESTINATION,
    PICKUP_DATE,
    PICKUP_TIME,
    DELIVERY_DATE,
    DELIVERY_TIME,
    WEIGHT,
    TEMPERATURE,
    STOPS,
];

// two-digit years first, %Y would read "24" as year 24
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

/// One freight shipment offered to carriers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRecord {
    pub trip: String,
    pub origin: String,
    pub destination: String,
    pub pickup: NaiveDateTime,
    pub delivery: NaiveDateTime,
    pub weight: String,
    pub temperature: String,
    pub stops: String,
}

impl LoadRecord {
    pub fn from_row(table: &Table, row: usize) -> Result<Self, RowError> {
        let fields = RowReader { table, row };
        Ok(Self {
            trip: fields.text(TRIP)?,
            origin: fields.text(ORIGIN)?,
            destination: fields.text(DESTINATION)?,
            pickup: fields.date(PICKUP_DATE)?.and_time(fields.time(PICKUP_TIME)?),
            delivery: fields
                .date(DELIVERY_DATE)?
                .and_time(fields.time(DELIVERY_TIME)?),
            weight: fields.text(WEIGHT)?,
            temperature: fields.text(TEMPERATURE)?,
            stops: fields.text(STOPS)?,
        })
    }
}

struct RowReader<'a> {
    table: &'a Table,
    row: usize,
}

impl RowReader<'_> {
    fn cell(&self, column: &str) -> Result<&Cell, RowError> {
        let cell = self.table.cell_by_name(self.row, column);
        if cell.is_empty() {
            return Err(RowError::MissingField {
                row: self.table.display_row_number(self.row),
                column: column.to_string(),
            });
        }
        Ok(cell)
    }

    fn invalid(&self, column: &str, cell: &Cell) -> RowError {
        RowError::InvalidField {
            row: self.table.display_row_number(self.row),
            column: column.to_string(),
            value: cell.to_string(),
        }
    }

    fn text(&self, column: &str) -> Result<String, RowError> {
        match self.cell(column)? {
            cell @ Cell::Error(_) => Err(self.invalid(column, cell)),
            cell => Ok(cell.to_string()),
        }
    }

    fn date(&self, column: &str) -> Result<NaiveDate, RowError> {
        let cell = self.cell(column)?;
        match cell {
            Cell::DateTime(dt) => Ok(dt.date()),
            Cell::Text(s) => parse_with(s.trim(), &DATE_FORMATS, NaiveDate::parse_from_str)
                .ok_or_else(|| self.invalid(column, cell)),
            _ => Err(self.invalid(column, cell)),
        }
    }

    fn time(&self, column: &str) -> Result<NaiveTime, RowError> {
        let cell = self.cell(column)?;
        match cell {
            Cell::DateTime(dt) => Ok(dt.time()),
            Cell::Text(s) => parse_with(
                &s.trim().to_ascii_uppercase(),
                &TIME_FORMATS,
                NaiveTime::parse_from_str,
            )
            .ok_or_else(|| self.invalid(column, cell)),
            _ => Err(self.invalid(column, cell)),
        }
    }
}

fn parse_with<T>(
    value: &str,
    formats: &[&str],
    parse: fn(&str, &str) -> chrono::ParseResult<T>,
) -> Option<T> {
    formats.iter().find_map(|format| parse(value, format).ok())
}
