#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use load_distro::configuration::{MailBackend, Settings};
use load_distro::load::LOAD_COLUMNS;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tempfile::TempDir;

pub struct LoadRow {
    pub trip: &'static str,
    pub origin: &'static str,
    /// left blank in the sheet when empty
    pub destination: &'static str,
    pub pickup: NaiveDateTime,
    pub delivery: NaiveDateTime,
    pub weight: f64,
    pub temperature: &'static str,
    pub stops: f64,
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

pub fn dallas_to_atlanta() -> LoadRow {
    LoadRow {
        trip: "123",
        origin: "Dallas, TX",
        destination: "Atlanta, GA",
        pickup: at(2024, 1, 5, 8, 0),
        delivery: at(2024, 1, 6, 14, 30),
        weight: 42000.0,
        temperature: "Frozen",
        stops: 1.0,
    }
}

pub fn write_load_list(path: &Path, rows: &[LoadRow]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("mm/dd/yyyy");
    let time_format = Format::new().set_num_format("hh:mm");

    for (col, name) in LOAD_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (i, load) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, load.trip).unwrap();
        sheet.write_string(r, 1, load.origin).unwrap();
        if !load.destination.is_empty() {
            sheet.write_string(r, 2, load.destination).unwrap();
        }
        sheet
            .write_datetime_with_format(r, 3, &load.pickup.date(), &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(r, 4, &load.pickup.time(), &time_format)
            .unwrap();
        sheet
            .write_datetime_with_format(r, 5, &load.delivery.date(), &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(r, 6, &load.delivery.time(), &time_format)
            .unwrap();
        sheet.write_number(r, 7, load.weight).unwrap();
        sheet.write_string(r, 8, load.temperature).unwrap();
        sheet.write_number(r, 9, load.stops).unwrap();
    }
    workbook.save(path).unwrap();
}

pub fn write_carrier_list(path: &Path, emails: &[&str]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Carrier").unwrap();
    sheet.write_string(0, 1, "Email").unwrap();
    for (i, email) in emails.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, format!("Carrier {r}")).unwrap();
        sheet.write_string(r, 1, *email).unwrap();
    }
    workbook.save(path).unwrap();
}

/// A temporary `distro_folder` with both lists and settings pointing at it.
pub struct TestDistro {
    pub dir: TempDir,
    pub settings: Settings,
}

pub fn distro_folder(loads: &[LoadRow], carriers: &[&str]) -> TestDistro {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.input.load_list = dir.path().join("load_list.xlsx");
    settings.input.carrier_list = dir.path().join("carrier_list.xlsx");

    write_load_list(&settings.input.load_list, loads);
    write_carrier_list(&settings.input.carrier_list, carriers);

    TestDistro { dir, settings }
}

pub fn use_http_backend(settings: &mut Settings, server: &mockito::ServerGuard) {
    settings.email_client.backend = MailBackend::Http;
    settings.email_client.base_url = server.url();
    settings.email_client.authorization_token = "test-token".into();
}
