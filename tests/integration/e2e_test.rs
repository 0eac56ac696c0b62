//! End-to-end integration tests

use super::feed_test::{feed, kline, mock_klines};
use chrono::{Duration, Utc};
use momentum_exit::config::Config;
use momentum_exit::execution::{AccountClient, PaperAccount};
use momentum_exit::poller::{Poller, PollerSettings, TickOutcome};
use momentum_exit::session::{JsonFileSessionStore, SessionStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_config_example_loads() {
    let config = Config::load("config.toml.example").unwrap();

    assert_eq!(config.market.symbol, "BTCUSDT");
    assert_eq!(config.poller.asset, "BTC");
    assert_eq!(config.decision.selling_timeframe(), Duration::hours(168));
    assert!(config.poller.force_sell_on_expiry);
}

async fn mock_ticker(server: &MockServer, price: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"symbol": "BTCUSDT", "price": price})),
        )
        .mount(server)
        .await;
}

fn settings() -> PollerSettings {
    PollerSettings {
        asset: "BTC".to_string(),
        risk_tolerance: dec!(0.5),
        selling_timeframe: Duration::weeks(1),
        interval: std::time::Duration::from_secs(60),
        force_sell_on_expiry: true,
    }
}

fn poller(
    server: &MockServer,
    account: Arc<PaperAccount>,
    sessions: Arc<JsonFileSessionStore>,
) -> Poller {
    Poller::new(settings(), account, Arc::new(feed(server)), sessions)
}

#[tokio::test]
async fn test_sells_after_peak_and_closes_session() {
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
    mock_ticker(&server, "215").await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = Arc::new(JsonFileSessionStore::new(dir.path().join("session.json")));
    let account = Arc::new(
        PaperAccount::new(dec!(0.001), Arc::new(feed(&server))).with_balance("BTC", dec!(0.5)),
    );
    let poller = poller(&server, account.clone(), sessions.clone());
    let now = Utc::now();

    let outcome = poller.tick_at(now).await.unwrap();
    let TickOutcome::Sold(Some(fill)) = outcome else {
        panic!("expected sale, got {outcome:?}");
    };
    assert_eq!(fill.quantity, dec!(0.5));
    assert_eq!(fill.price, dec!(215));
    assert_eq!(fill.fees, dec!(0.1075));
    assert_eq!(account.free_balance("BTC").await.unwrap(), Decimal::ZERO);

    // Session persisted until the empty balance is observed
    assert!(dir.path().join("session.json").exists());
    assert!(sessions.load("BTC").await.unwrap().is_some());

    let outcome = poller.tick_at(now + Duration::hours(1)).await.unwrap();
    assert_eq!(outcome, TickOutcome::Idle);
    assert!(sessions.load("BTC").await.unwrap().is_none());
}

#[tokio::test]
async fn test_deadline_survives_restart() {
    let server = MockServer::start().await;
    mock_klines(
        &server,
        vec![
            kline(1_704_067_200_000, "60", "125"),
            kline(1_704_070_800_000, "125", "230"),
        ],
    )
    .await;
    mock_ticker(&server, "230").await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let now = Utc::now();

    let account = Arc::new(
        PaperAccount::new(dec!(0), Arc::new(feed(&server))).with_balance("BTC", dec!(1)),
    );
    let first = poller(
        &server,
        account.clone(),
        Arc::new(JsonFileSessionStore::new(path.clone())),
    );
    assert!(matches!(
        first.tick_at(now).await.unwrap(),
        TickOutcome::Held(_)
    ));
    drop(first);

    // A fresh process reads the same file and keeps the first deadline
    let sessions = Arc::new(JsonFileSessionStore::new(path));
    let second = poller(&server, account, sessions.clone());
    second.tick_at(now + Duration::days(1)).await.unwrap();

    let session = sessions.load("BTC").await.unwrap().unwrap();
    assert_eq!(session.deadline, now + Duration::weeks(1));
}

#[tokio::test]
async fn test_feed_outage_keeps_balance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mock_ticker(&server, "100").await;

    let dir = tempfile::tempdir().unwrap();
    let account = Arc::new(
        PaperAccount::new(dec!(0), Arc::new(feed(&server))).with_balance("BTC", dec!(1)),
    );
    let poller = poller(
        &server,
        account.clone(),
        Arc::new(JsonFileSessionStore::new(dir.path().join("session.json"))),
    );

    assert!(poller.tick_at(Utc::now()).await.is_err());
    assert_eq!(account.free_balance("BTC").await.unwrap(), dec!(1));
}

#[tokio::test]
async fn test_restart_after_sale_is_idle() {
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
    mock_ticker(&server, "215").await;

    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("paper_account.json");
    let session_file = dir.path().join("session.json");
    let now = Utc::now();

    let open_account = || {
        PaperAccount::open(
            ledger.clone(),
            dec!(0.001),
            Arc::new(feed(&server)),
            "BTC",
            dec!(0.5),
        )
    };

    let account = Arc::new(open_account().await.unwrap());
    let first = poller(
        &server,
        account,
        Arc::new(JsonFileSessionStore::new(session_file.clone())),
    );
    assert!(matches!(
        first.tick_at(now).await.unwrap(),
        TickOutcome::Sold(Some(_))
    ));
    drop(first);

    // A new process reloads the ledger instead of the starting balance
    let account = Arc::new(open_account().await.unwrap());
    assert_eq!(account.free_balance("BTC").await.unwrap(), Decimal::ZERO);

    let sessions = Arc::new(JsonFileSessionStore::new(session_file));
    let second = poller(&server, account, sessions.clone());
    let outcome = second.tick_at(now + Duration::hours(1)).await.unwrap();

    assert_eq!(outcome, TickOutcome::Idle);
    assert!(sessions.load("BTC").await.unwrap().is_none());
}
