//! Binance REST feed against a mock server

use momentum_exit::engine::CandleSource;
use momentum_exit::feed::{BinanceConfig, BinanceKlines, PriceQuote};
use rust_decimal_macros::dec;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn feed(server: &MockServer) -> BinanceKlines {
    BinanceKlines::with_config(BinanceConfig {
        base_url: server.uri(),
        symbol: "btcusdt".to_string(),
        ..Default::default()
    })
    .unwrap()
}

pub fn kline(open_time: i64, open: &str, close: &str) -> serde_json::Value {
    serde_json::json!([
        open_time,
        open,
        "100000",
        "0.01",
        close,
        "1.0",
        open_time + 3_599_999,
        "0",
        10,
        "0",
        "0",
        "0"
    ])
}

pub async fn mock_klines(server: &MockServer, rows: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1h"))
        .and(query_param("limit", "168"))
        .and(query_param_is_missing("startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Array(rows)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_candles_in_order() {
    let server = MockServer::start().await;
    mock_klines(
        &server,
        vec![
            kline(1_704_067_200_000, "60", "125"),
            kline(1_704_070_800_000, "125", "230"),
            kline(1_704_074_400_000, "230", "215"),
        ],
    )
    .await;

    let candles = feed(&server).fetch_candles().await.unwrap();

    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0].growth(), dec!(65));
    assert_eq!(candles[2].growth(), dec!(-15));
    assert!(candles[0].open_time < candles[1].open_time);
}

#[tokio::test]
async fn empty_window_yields_no_candles() {
    let server = MockServer::start().await;
    mock_klines(&server, vec![]).await;

    let candles = feed(&server).fetch_candles().await.unwrap();
    assert!(candles.is_empty());
}

#[tokio::test]
async fn api_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .mount(&server)
        .await;

    let err = feed(&server).fetch_candles().await.unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn quotes_last_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"symbol": "BTCUSDT", "price": "42150.25"})),
        )
        .mount(&server)
        .await;

    let price = feed(&server).last_price().await.unwrap();
    assert_eq!(price, dec!(42150.25));
}
