use crate::common;
use httpmock::Method::GET;
use moex_iss::IssError;
use serde_json::json;

const LISTING: &str = "/iss/history/engines/stock/markets/shares/boards/TQBR/listing.json";

#[tokio::test]
async fn failing_page_aborts_the_fetch_with_its_offset() {
    let server = common::setup_server();
    let p0 = common::mock_page(
        &server,
        LISTING,
        0,
        common::block_body("securities", &["SECID"], vec![json!(["SBER"]), json!(["GAZP"])]),
    );
    let p1 = server.mock(|when, then| {
        when.method(GET).path(LISTING).query_param("start", "2");
        then.status(502).body("bad gateway");
    });

    let client = common::anon_builder(&server).build().unwrap();
    let err = client
        .history_listing(&moex_iss::Board::default())
        .await
        .unwrap_err();

    p0.assert();
    p1.assert();
    assert!(err.is_transport());
    match err {
        IssError::Fetch { start, source } => {
            assert_eq!(start, 2);
            match *source {
                IssError::Status { status, url } => {
                    assert_eq!(status, 502);
                    assert!(url.contains("start=2"), "{url}");
                }
                other => panic!("expected Status source, got {other:?}"),
            }
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_failure_at_offset_zero() {
    let server = common::setup_server();
    let _p0 = server.mock(|when, then| {
        when.method(GET).path(LISTING).query_param("start", "0");
        then.status(200).body("<html>maintenance</html>");
    });

    let client = common::anon_builder(&server).build().unwrap();
    let err = client
        .history_listing(&moex_iss::Board::default())
        .await
        .unwrap_err();

    assert!(err.is_decode());
    match err {
        IssError::Fetch { start, source } => {
            assert_eq!(start, 0);
            assert!(matches!(*source, IssError::Json(_)), "got {source:?}");
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_envelope_on_a_later_page_is_reported() {
    let server = common::setup_server();
    let _p0 = common::mock_page(
        &server,
        LISTING,
        0,
        common::block_body("securities", &["SECID"], vec![json!(["SBER"])]),
    );
    let _p1 = common::mock_page(
        &server,
        LISTING,
        1,
        common::block_body("history", &["SECID"], vec![]),
    );

    let client = common::anon_builder(&server).build().unwrap();
    let err = client
        .history_listing(&moex_iss::Board::default())
        .await
        .unwrap_err();

    match err {
        IssError::Fetch { start, source } => {
            assert_eq!(start, 1);
            match *source {
                IssError::Data(msg) => assert!(msg.contains("securities"), "{msg}"),
                other => panic!("expected Data source, got {other:?}"),
            }
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn single_shot_endpoints_return_the_raw_error() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/iss/statistics/engines/stock/splits.json");
        then.status(500).body("oops");
    });

    let client = common::anon_builder(&server).build().unwrap();
    let err = client.splits().await.unwrap_err();
    mock.assert();

    match err {
        IssError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.contains("/splits.json"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}
