use crate::common::{self, SteppingClock};
use chrono::{NaiveDate, TimeZone, Utc};
use httpmock::Method::GET;
use serde_json::json;
use std::sync::Arc;

const CORRELATIONS: &str = "/iss/statistics/engines/stock/markets/shares/correlations.json";

#[tokio::test]
async fn default_date_is_fixed_for_the_whole_fetch() {
    let server = common::setup_server();
    // today() rolls forward one day per call; only a single evaluation keeps the date stable
    let clock = Arc::new(SteppingClock::new(
        Utc.with_ymd_and_hms(2024, 5, 10, 23, 59, 59).unwrap(),
    ));

    let p0 = server.mock(|when, then| {
        when.method(GET)
            .path(CORRELATIONS)
            .query_param("start", "0")
            .query_param("date", "2024-05-09");
        then.status(200).body(common::block_body(
            "coefficients",
            &["secid", "coefficient"],
            vec![json!(["SBER", 0.81]), json!(["GAZP", 0.64])],
        ));
    });
    let p1 = server.mock(|when, then| {
        when.method(GET)
            .path(CORRELATIONS)
            .query_param("start", "2")
            .query_param("date", "2024-05-09");
        then.status(200)
            .body(common::block_body("coefficients", &["secid", "coefficient"], vec![]));
    });

    let client = common::anon_builder(&server)
        .clock(clock.clone())
        .build()
        .unwrap();
    let table = client.correlations("stock", "shares", None).await.unwrap();

    p0.assert();
    p1.assert();
    assert_eq!(clock.today_calls(), 1);
    assert_eq!(table.len(), 2);
}

#[tokio::test]
async fn explicit_date_is_sent_on_every_page() {
    let server = common::setup_server();
    let clock = Arc::new(SteppingClock::new(
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
    ));

    let p0 = server.mock(|when, then| {
        when.method(GET)
            .path(CORRELATIONS)
            .query_param("start", "0")
            .query_param("date", "2023-12-29");
        then.status(200).body(common::block_body(
            "coefficients",
            &["secid"],
            vec![json!(["LKOH"])],
        ));
    });
    let p1 = server.mock(|when, then| {
        when.method(GET)
            .path(CORRELATIONS)
            .query_param("start", "1")
            .query_param("date", "2023-12-29");
        then.status(200)
            .body(common::block_body("coefficients", &["secid"], vec![]));
    });

    let client = common::anon_builder(&server)
        .clock(clock.clone())
        .build()
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2023, 12, 29);
    let table = client.correlations("stock", "shares", date).await.unwrap();

    p0.assert();
    p1.assert();
    assert_eq!(clock.today_calls(), 0, "an explicit date needs no clock");
    assert_eq!(table.rows, vec![vec![json!("LKOH")]]);
}
