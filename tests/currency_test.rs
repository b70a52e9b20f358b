//! Currency-rate proxy against a mocked exchange-rate API

mod helpers;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};

use fivemgolf::services::CurrencyService;
use fivemgolf::utils::errors::CurrencyError;
use fivemgolf::FiveMGolfError;
use helpers::*;

#[tokio::test]
async fn test_rate_is_fetched_with_normalized_codes() {
    let api = CurrencyMockServer::new().await;
    api.mock_rate("JPY", "KRW", 9.12, 1).await;

    let service = CurrencyService::new(api.config(), None).unwrap();
    let rate = service.get_rate(" jpy", "krw").await.unwrap();

    assert_eq!(rate.base, "JPY");
    assert_eq!(rate.target, "KRW");
    assert!((rate.rate - 9.12).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_same_currency_skips_the_api() {
    let api = CurrencyMockServer::new().await;
    let service = CurrencyService::new(api.config(), None).unwrap();

    let rate = service.get_rate("KRW", "KRW").await.unwrap();
    assert_eq!(rate.rate, 1.0);
    assert!(api.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_code_and_upstream_failure() {
    let api = CurrencyMockServer::new().await;
    api.mock_failure(500).await;
    let service = CurrencyService::new(api.config(), None).unwrap();

    assert_matches!(
        service.get_rate("YEN", "KR").await,
        Err(FiveMGolfError::Currency(CurrencyError::UnsupportedCurrency(_)))
    );
    assert_matches!(
        service.get_rate("JPY", "USD").await,
        Err(FiveMGolfError::Currency(CurrencyError::RequestFailed(_)))
    );
}

#[tokio::test]
async fn test_currency_endpoint() {
    let api = CurrencyMockServer::new().await;
    api.mock_rate("JPY", "KRW", 9.12, 1).await;

    let mut settings = test_settings();
    settings.currency = api.config();
    let ctx = TestContext::with_settings(settings).await;

    let (status, body) = ctx.request(Method::GET, "/api/currency-rate?base=JPY&target=KRW", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["target"], "KRW");

    let (status, body) = ctx.request(Method::GET, "/api/currency-rate?base=JPY&target=K1", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_currency_endpoint_is_rate_limited_per_client() {
    let api = CurrencyMockServer::new().await;
    let mut settings = test_settings();
    settings.currency = api.config();
    settings.currency.requests_per_minute = 2;
    let ctx = TestContext::with_settings(settings).await;

    let uri = "/api/currency-rate?base=KRW&target=KRW";
    let client = [("x-forwarded-for", "198.51.100.7")];
    for _ in 0..2 {
        let (status, _) = ctx.send(Method::GET, uri, &client, None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = ctx.send(Method::GET, uri, &client, None, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "rate_limited");

    // another client still has its own quota
    let (status, _) = ctx.send(Method::GET, uri, &[("x-forwarded-for", "198.51.100.8")], None, None).await;
    assert_eq!(status, StatusCode::OK);
}
