use crate::common;
use serde_json::json;

const SECURITIES: &str = "/iss/securities.json";

#[tokio::test]
async fn pages_are_concatenated_until_an_empty_page() {
    let server = common::setup_server();
    let p0 = common::mock_page(
        &server,
        SECURITIES,
        0,
        common::block_body("securities", &["id", "name"], vec![json!([1, "A"]), json!([2, "B"])]),
    );
    let p1 = common::mock_page(
        &server,
        SECURITIES,
        2,
        common::block_body("securities", &["id", "name"], vec![json!([3, "C"])]),
    );
    let p2 = common::mock_page(
        &server,
        SECURITIES,
        3,
        common::block_body("securities", &[], vec![]),
    );

    let client = common::anon_builder(&server).build().unwrap();
    let table = client.securities_list().await.unwrap();

    p0.assert();
    p1.assert();
    p2.assert();
    assert_eq!(table.columns, vec!["id", "name"]);
    assert_eq!(
        table.rows,
        vec![
            vec![json!(1), json!("A")],
            vec![json!(2), json!("B")],
            vec![json!(3), json!("C")],
        ]
    );
}

#[tokio::test]
async fn empty_first_page_yields_empty_table_with_its_columns() {
    let server = common::setup_server();
    let p0 = common::mock_page(
        &server,
        SECURITIES,
        0,
        common::block_body("securities", &["secid", "shortname"], vec![]),
    );

    let client = common::anon_builder(&server).build().unwrap();
    let table = client.securities_list().await.unwrap();

    p0.assert_hits(1);
    assert!(table.is_empty());
    assert_eq!(table.columns, vec!["secid", "shortname"]);
}

#[tokio::test]
async fn columns_come_from_the_last_non_empty_page() {
    let server = common::setup_server();
    let _p0 = common::mock_page(
        &server,
        SECURITIES,
        0,
        common::block_body("securities", &["old"], vec![json!(["x"])]),
    );
    let _p1 = common::mock_page(
        &server,
        SECURITIES,
        1,
        common::block_body("securities", &["new"], vec![json!(["y"])]),
    );
    let _p2 = common::mock_page(
        &server,
        SECURITIES,
        2,
        common::block_body("securities", &["ignored"], vec![]),
    );

    let client = common::anon_builder(&server).build().unwrap();
    let table = client.securities_list().await.unwrap();

    assert_eq!(table.columns, vec!["new"]);
    assert_eq!(table.len(), 2);
}

#[tokio::test]
async fn uneven_page_sizes_advance_by_rows_received() {
    let server = common::setup_server();
    let rows = |n: usize, base: usize| -> Vec<serde_json::Value> {
        (0..n).map(|i| json!([base + i])).collect()
    };
    let p0 = common::mock_page(&server, SECURITIES, 0, common::block_body("securities", &["n"], rows(100, 0)));
    let p1 = common::mock_page(&server, SECURITIES, 100, common::block_body("securities", &["n"], rows(37, 100)));
    let p2 = common::mock_page(&server, SECURITIES, 137, common::block_body("securities", &["n"], vec![]));

    let client = common::anon_builder(&server).build().unwrap();
    let table = client.securities_list().await.unwrap();

    p0.assert();
    p1.assert();
    p2.assert();
    assert_eq!(table.len(), 137);
    assert_eq!(table.get(136, "n"), Some(&json!(136)));
}
