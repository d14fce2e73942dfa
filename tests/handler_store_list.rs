mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{ADMIN_TOKEN, bearer, create_test_context, make_server};

fn codes(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_stores_defaults() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(codes(&json), vec!["DEFAULT", "mall", "shop", "acme"]);
    assert_eq!(json["totalCount"], 4);
    assert_eq!(json["recordsTotal"], 4);
    assert_eq!(json["recordsFiltered"], 4);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["number"], 4);
    assert!(json.get("draw").is_none());
}

#[tokio::test]
async fn test_list_stores_pagination() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?start=2&length=2")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(codes(&json), vec!["shop", "acme"]);
    assert_eq!(json["totalCount"], 4);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["number"], 2);
}

#[tokio::test]
async fn test_list_stores_total_pages_round_up() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?length=3")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["totalPages"], 2);
}

#[tokio::test]
async fn test_list_stores_filters_match_all() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?code=a&name=STORE")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(codes(&json), vec!["DEFAULT"]);
    assert_eq!(json["totalCount"], 1);
}

#[tokio::test]
async fn test_list_stores_search_replaces_filters() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?search=shop&code=acme")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(codes(&response.json::<Value>()), vec!["shop"]);
}

#[tokio::test]
async fn test_list_stores_search_matches_name() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?search=supplies")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(codes(&response.json::<Value>()), vec!["acme"]);
}

#[tokio::test]
async fn test_list_stores_order_by_name_desc() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?orderBy=name&direction=DESC")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(
        codes(&response.json::<Value>()),
        vec!["mall", "DEFAULT", "shop", "acme"]
    );
}

#[tokio::test]
async fn test_list_stores_localized_in_default_language() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?code=mall")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"][0]["address"]["countryName"],
        "United States"
    );
}

#[tokio::test]
async fn test_list_stores_echoes_draw() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    let response = server
        .get("/api/v1/private/stores?draw=7")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["draw"], 7);
}

#[tokio::test]
async fn test_list_stores_invalid_parameters() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    for query in [
        "orderBy=email",
        "direction=sideways",
        "length=0",
        "length=1001",
        "start=-1",
        "start=abc",
        "draw=abc",
    ] {
        let response = server
            .get(&format!("/api/v1/private/stores?{query}"))
            .add_header("Authorization", bearer(ADMIN_TOKEN))
            .await;

        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "query: {query}"
        );
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_list_stores_requires_auth() {
    let ctx = create_test_context();
    let server = make_server(&ctx);

    server
        .get("/api/v1/private/stores")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
