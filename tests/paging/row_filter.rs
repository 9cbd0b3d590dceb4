use crate::common;
use chrono::NaiveDate;
use httpmock::Method::GET;
use serde_json::json;

const DEVIATION: &str = "/iss/statistics/engines/stock/deviationcoeffs.json";
const COLUMNS: &[&str] = &["secid", "c1", "c2", "c3", "c4", "c5", "c6"];

#[tokio::test]
async fn all_zero_coefficient_rows_are_dropped() {
    let server = common::setup_server();
    let p0 = server.mock(|when, then| {
        when.method(GET)
            .path(DEVIATION)
            .query_param("start", "0")
            .query_param("date", "2024-02-01");
        then.status(200).body(common::block_body(
            "securities",
            COLUMNS,
            vec![
                json!(["SBER", 0, 0, 0, 0, 0, 0]),
                json!(["GAZP", 0, 0, 0, 0, 0, 1]),
                json!(["LKOH", 0.0, 0, 0, 0, 0.0, 0]),
            ],
        ));
    });
    // the offset counts every received row, including the dropped ones
    let p1 = server.mock(|when, then| {
        when.method(GET)
            .path(DEVIATION)
            .query_param("start", "3")
            .query_param("date", "2024-02-01");
        then.status(200).body(common::block_body(
            "securities",
            COLUMNS,
            vec![json!(["YNDX", 0, 0, 0, 0, 0, 0])],
        ));
    });
    let p2 = server.mock(|when, then| {
        when.method(GET)
            .path(DEVIATION)
            .query_param("start", "4")
            .query_param("date", "2024-02-01");
        then.status(200)
            .body(common::block_body("securities", COLUMNS, vec![]));
    });

    let client = common::anon_builder(&server).build().unwrap();
    let table = client
        .deviation_coeffs("stock", NaiveDate::from_ymd_opt(2024, 2, 1))
        .await
        .unwrap();

    p0.assert();
    p1.assert();
    p2.assert();
    assert_eq!(table.columns, COLUMNS);
    assert_eq!(table.rows, vec![vec![
        json!("GAZP"),
        json!(0),
        json!(0),
        json!(0),
        json!(0),
        json!(0),
        json!(1)
    ]]);
}

#[tokio::test]
async fn other_endpoints_keep_zero_rows() {
    let server = common::setup_server();
    let _p0 = common::mock_page(
        &server,
        "/iss/securities.json",
        0,
        common::block_body("securities", COLUMNS, vec![json!(["ZERO", 0, 0, 0, 0, 0, 0])]),
    );
    let _p1 = common::mock_page(
        &server,
        "/iss/securities.json",
        1,
        common::block_body("securities", COLUMNS, vec![]),
    );

    let client = common::anon_builder(&server).build().unwrap();
    let table = client.securities_list().await.unwrap();
    assert_eq!(table.len(), 1);
}
