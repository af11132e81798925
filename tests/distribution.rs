mod utils;

use load_distro::errors::{AppError, RowError};
use load_distro::{prepare_distribution, run_with};
use mockito::Matcher;
use utils::{LoadRow, at, dallas_to_atlanta, distro_folder, use_http_backend};

#[tokio::test]
async fn every_valid_carrier_gets_one_email() {
    let mut server = mockito::Server::new_async().await;
    let mut distro = distro_folder(
        &[dallas_to_atlanta()],
        &["dispatch@carrier-one.com", "not-an-email", "loads@carrier-two.com"],
    );
    use_http_backend(&mut distro.settings, &server);

    let mock = server
        .mock("POST", "/email")
        .match_header("X-Postmark-Server-Token", "test-token")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "subject": "Available Loads True Blue SCM - 03/07/24 09:04",
        })))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let report = run_with(&distro.settings, at(2024, 3, 7, 9, 4))
        .await
        .expect("run failed");

    assert_eq!(report.attempted, 3);
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn server_errors_do_not_stop_the_run() {
    let mut server = mockito::Server::new_async().await;
    let mut distro = distro_folder(
        &[dallas_to_atlanta()],
        &["a@carrier-one.com", "b@carrier-two.com", "c@carrier-three.com"],
    );
    use_http_backend(&mut distro.settings, &server);

    let rejected = server
        .mock("POST", "/email")
        .match_body(Matcher::PartialJson(serde_json::json!({ "to": "b@carrier-two.com" })))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("POST", "/email")
        .match_body(Matcher::AnyOf(vec![
            Matcher::PartialJson(serde_json::json!({ "to": "a@carrier-one.com" })),
            Matcher::PartialJson(serde_json::json!({ "to": "c@carrier-three.com" })),
        ]))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let report = run_with(&distro.settings, at(2024, 3, 7, 9, 4))
        .await
        .expect("run failed");

    assert_eq!(report.attempted, 3);
    assert_eq!(report.sent, 2);
    assert!(!report.outcomes[1].is_sent());
    rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn missing_load_list_aborts_before_sending() {
    let mut server = mockito::Server::new_async().await;
    let mut distro = distro_folder(&[dallas_to_atlanta()], &["a@carrier-one.com"]);
    use_http_backend(&mut distro.settings, &server);
    std::fs::remove_file(&distro.settings.input.load_list).unwrap();

    let mock = server
        .mock("POST", "/email")
        .expect(0)
        .create_async()
        .await;

    let err = run_with(&distro.settings, at(2024, 3, 7, 9, 4))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, AppError::FileNotFound(p) if p == &distro.settings.input.load_list),
        "unexpected error: {err}"
    );
    assert!(err.to_string().starts_with("File not found: "));
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_carrier_list_aborts_before_sending() {
    let mut server = mockito::Server::new_async().await;
    let mut distro = distro_folder(&[dallas_to_atlanta()], &["a@carrier-one.com"]);
    use_http_backend(&mut distro.settings, &server);
    distro.settings.input.carrier_list = distro.dir.path().join("nope.xlsx");

    let mock = server
        .mock("POST", "/email")
        .expect(0)
        .create_async()
        .await;

    let res = run_with(&distro.settings, at(2024, 3, 7, 9, 4)).await;

    assert!(matches!(res, Err(AppError::FileNotFound(_))));
    mock.assert_async().await;
}

#[test]
fn workbook_loads_render_into_the_body() {
    let distro = distro_folder(
        &[
            dallas_to_atlanta(),
            LoadRow {
                trip: "124",
                destination: "",
                ..dallas_to_atlanta()
            },
            LoadRow {
                trip: "125",
                origin: "Reno, NV",
                destination: "Boise, ID",
                pickup: at(2024, 11, 20, 23, 5),
                delivery: at(2024, 12, 1, 6, 0),
                weight: 38500.0,
                temperature: "Dry",
                stops: 2.0,
            },
        ],
        &["a@carrier-one.com"],
    );

    let distribution =
        prepare_distribution(&distro.settings, at(2024, 3, 7, 9, 4)).expect("prepare failed");

    assert_eq!(
        distribution.message.body,
        "Dear Carrier,\n\nHere are the available loads:\n\n\
         Trip: 123 | Dallas, TX → Atlanta, GA\n\
         Pickup: 01/05/24 08:00 | Delivery: 01/06/24 14:30\n\
         Weight: 42000 Lbs | Temp: Frozen | Stops: 1\n\
         -------------------------\n\
         \n\
         Trip: 125 | Reno, NV → Boise, ID\n\
         Pickup: 11/20/24 23:05 | Delivery: 12/01/24 06:00\n\
         Weight: 38500 Lbs | Temp: Dry | Stops: 2\n\
         -------------------------\n\
         \nThank you,\nTrue Blue SCM Team"
    );
    assert_eq!(distribution.skipped_rows.len(), 1);
    assert_eq!(distribution.skipped_rows[0].row(), 3);
    assert_eq!(distribution.carriers.len(), 1);
}

#[tokio::test]
async fn load_list_without_load_columns_still_reaches_every_carrier() {
    let mut server = mockito::Server::new_async().await;
    let mut distro = distro_folder(
        &[dallas_to_atlanta()],
        &["a@carrier-one.com", "b@carrier-two.com"],
    );
    use_http_backend(&mut distro.settings, &server);
    // a carrier sheet where the load list should be
    utils::write_carrier_list(
        &distro.settings.input.load_list,
        &["x@carrier-one.com", "y@carrier-two.com"],
    );

    let distribution =
        prepare_distribution(&distro.settings, at(2024, 3, 7, 9, 4)).expect("prepare failed");
    assert_eq!(distribution.skipped_rows.len(), 2);
    assert!(distribution.skipped_rows.iter().all(|e| matches!(
        e,
        RowError::MissingField { column, .. } if column == "Trip"
    )));
    assert_eq!(
        distribution.message.body,
        "Dear Carrier,\n\nHere are the available loads:\n\n\nThank you,\nTrue Blue SCM Team"
    );

    let mock = server
        .mock("POST", "/email")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let report = run_with(&distro.settings, at(2024, 3, 7, 9, 4))
        .await
        .expect("run failed");
    assert_eq!(report.sent, 2);
    mock.assert_async().await;
}

#[test]
fn carrier_list_without_email_column_is_fatal() {
    let distro = distro_folder(&[dallas_to_atlanta()], &["a@carrier-one.com"]);
    // a load sheet where the carrier list should be
    utils::write_load_list(&distro.settings.input.carrier_list, &[dallas_to_atlanta()]);

    let err = prepare_distribution(&distro.settings, at(2024, 3, 7, 9, 4)).unwrap_err();
    assert!(matches!(err, AppError::MissingColumn { column, .. } if column == "Email"));
}
