//! Integration tests for `SheetClient`.
//!
//! Each test stands up a local `wiremock` server so no real network traffic
//! is made.

use rust_decimal::Decimal;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricebook_sheet::{SheetClient, SheetError};

const SHEET_PATH: &str = "/spreadsheets/d/sheet-123/gviz/tq";

fn test_client(server: &MockServer) -> SheetClient {
    SheetClient::new(5, "pricebook-test/0.1", 0, 0)
        .expect("failed to build test SheetClient")
        .with_base_url(&server.uri())
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> SheetClient {
    SheetClient::new(5, "pricebook-test/0.1", max_retries, 0)
        .expect("failed to build test SheetClient")
        .with_base_url(&server.uri())
}

// ---------------------------------------------------------------------------
// happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_sheet_returns_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .and(query_param("tqx", "out:csv"))
        .and(query_param("sheet", "CATÁLOGO"))
        .respond_with(ResponseTemplate::new(200).set_body_string("SKU,MODELO\nS1,M1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client(&server)
        .fetch_sheet("sheet-123", "CATÁLOGO")
        .await
        .expect("fetch should succeed");
    assert_eq!(text, "SKU,MODELO\nS1,M1\n");
}

#[tokio::test]
async fn fetch_catalog_ingests_products() {
    let server = MockServer::start().await;
    let body = "\"SKU\",\"MODELO\",\"VALOR\",\"PROMOÇÃO\"\n\
                \"IP11\",\"IP 11\",\"R$ 1.234,56\",\"R$ 1.100,00\"\n\
                \"\",\"SEM SKU\",\"R$ 5,00\",\"\"\n";
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .and(query_param("sheet", "CATÁLOGO"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let catalog = test_client(&server)
        .fetch_catalog("sheet-123", "CATÁLOGO")
        .await
        .expect("fetch should succeed");

    assert_eq!(catalog.len(), 1);
    let product = &catalog.products[0];
    assert_eq!(product.sku, "IP11");
    assert_eq!(product.base_price, Decimal::new(123_456, 2));
    assert_eq!(product.promotional_price, Some(Decimal::new(1100, 0)));
}

#[tokio::test]
async fn fetch_price_codes_ingests_book() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .and(query_param("sheet", "CODIGOS"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("CODIGO,REFERENCIA\nVIP,10%\nLOJA,VALOR B\n"),
        )
        .mount(&server)
        .await;

    let book = test_client(&server)
        .fetch_price_codes("sheet-123", "CODIGOS")
        .await
        .expect("fetch should succeed");

    assert_eq!(book.len(), 2);
    assert_eq!(book.lookup("vip"), Some("10%"));
    assert_eq!(book.lookup("loja"), Some("VALOR B"));
}

// ---------------------------------------------------------------------------
// error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_maps_to_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3)
        .fetch_sheet("sheet-123", "CATÁLOGO")
        .await;
    assert!(
        matches!(result, Err(SheetError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn rate_limit_reads_retry_after_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_sheet("sheet-123", "CATÁLOGO").await;
    assert!(
        matches!(result, Err(SheetError::RateLimited { retry_after_secs: 17 })),
        "expected RateLimited(17), got: {result:?}"
    );
}

#[tokio::test]
async fn rate_limit_without_header_defaults_to_sixty_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_sheet("sheet-123", "CATÁLOGO").await;
    assert!(matches!(
        result,
        Err(SheetError::RateLimited {
            retry_after_secs: 60
        })
    ));
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3)
        .fetch_sheet("sheet-123", "CATÁLOGO")
        .await;
    assert!(matches!(
        result,
        Err(SheetError::UnexpectedStatus { status: 403, .. })
    ));
}

// ---------------------------------------------------------------------------
// retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("CODIGO,REFERENCIA\nA,1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client_with_retries(&server, 3)
        .fetch_sheet("sheet-123", "CODIGOS")
        .await
        .expect("third attempt should succeed");
    assert!(text.starts_with("CODIGO"));
}

#[tokio::test]
async fn server_error_surfaces_after_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 2)
        .fetch_sheet("sheet-123", "CODIGOS")
        .await;
    assert!(matches!(
        result,
        Err(SheetError::UnexpectedStatus { status: 500, .. })
    ));
}
