use crate::errors::AppError;
use crate::spreadsheet::Table;

pub const EMAIL: &str = "Email";

/// A recipient of the load list. The address is taken verbatim from the
/// sheet and only validated when the email is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierRecord {
    pub row: usize,
    pub email: String,
}

pub fn carriers_from_table(table: &Table) -> Result<Vec<CarrierRecord>, AppError> {
    table.require_columns(&[EMAIL])?;
    Ok((0..table.len())
        .map(|row| CarrierRecord {
            row: table.display_row_number(row),
            email: table.cell_by_name(row, EMAIL).to_string(),
        })
        .collect())
}
