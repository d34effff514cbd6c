//! Provider adapters against mocked HTTP endpoints

use indicator_monitor::config::{ProviderSettings, ProvidersConfig};
use indicator_monitor::error::{ConfigurationError, ProviderError};
use indicator_monitor::services::providers::{
    build_providers, BlockchainCenterProvider, CoinglassProvider, GlassnodeProvider,
    MicroStrategyProvider, PredictionProvider, ProviderKind, TradingViewProvider,
};
use indicator_monitor::services::IndicatorProvider;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn settings(server: &MockServer, key: Option<&str>) -> ProviderSettings {
    ProviderSettings {
        base_url: Some(server.uri()),
        api_key: key.map(str::to_string),
    }
}

async fn mount_value(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn glassnode_reads_latest_series_value_with_query_key() {
    let server = MockServer::start().await;
    let routes = [
        ("/v1/metrics/indicators/net_unrealized_profit_loss", 0.62),
        ("/v1/metrics/indicators/rhodl_ratio", 15000.0),
        ("/v1/metrics/indicators/puell_multiple", 1.4),
        ("/v1/metrics/indicators/reserve_risk", 0.004),
        ("/v1/metrics/market/mvrv_z_score", 2.1),
        ("/v1/metrics/supply/short_term_holder_supply", 3_100_000.0),
    ];
    for (route, value) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("api_key", "gn-key"))
            .and(query_param("resolution", "24h"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "t": 1700000000, "value": value }])))
            .expect(1)
            .mount(&server)
            .await;
    }
    // Empty series degrades to 0
    mount_value(&server, "/v1/metrics/transactions/long_term_holder_outflow", json!([])).await;

    let provider = GlassnodeProvider::new(&settings(&server, Some("gn-key")), TIMEOUT).unwrap();
    let snapshot = provider.fetch().await.unwrap();

    assert_eq!(snapshot.len(), 7);
    assert_eq!(snapshot["nupl"], 0.62);
    assert_eq!(snapshot["rhodl"], 15000.0);
    assert_eq!(snapshot["mvrv"], 2.1);
    assert_eq!(snapshot["ltHolderOutflow"], 0.0);
}

#[tokio::test]
async fn coinglass_reads_data_fields_and_numeric_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public/v2/indicator"))
        .and(header("coinglassSecret", "cg-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "0",
            "data": {
                "altSeasonBtcTop": 0,
                "altSeasonIndex": "41",
                "cbi": 77.5,
                "etfNetOutflow": 3,
                "etfBtcRatio": 5.2,
                "annualRate3m": "12.75"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = CoinglassProvider::new(&settings(&server, Some("cg-key")), TIMEOUT).unwrap();
    let snapshot = provider.fetch().await.unwrap();

    assert_eq!(snapshot["altSeasonIndex"], 41.0);
    assert_eq!(snapshot["cbi"], 77.5);
    assert_eq!(snapshot["annualRate3m"], 12.75);
    assert_eq!(snapshot["usdtSavingsRate"], 0.0);
}

#[tokio::test]
async fn tradingview_sends_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-TV-KEY", "tv-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 1.25 })))
        .expect(7)
        .mount(&server)
        .await;

    let provider = TradingViewProvider::new(&settings(&server, Some("tv-key")), TIMEOUT).unwrap();
    let snapshot = provider.fetch().await.unwrap();

    assert_eq!(snapshot.len(), 7);
    assert!(snapshot.values().all(|v| *v == 1.25));
    assert!(snapshot.contains_key("ahr999Accumulation"));
    assert!(snapshot.contains_key("oscillatorBMO"));
}

#[tokio::test]
async fn blockchain_center_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/metrics/bitcoin_temperature"))
        .and(header("authorization", "Bearer bc-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 64.0 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/metrics/rainbow_chart"))
        .and(header("authorization", "Bearer bc-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "5" })))
        .mount(&server)
        .await;

    let provider = BlockchainCenterProvider::new(&settings(&server, Some("bc-key")), TIMEOUT).unwrap();
    let snapshot = provider.fetch().await.unwrap();

    assert_eq!(snapshot["btIndex"], 64.0);
    assert_eq!(snapshot["rainbowChart"], 5.0);
}

#[tokio::test]
async fn microstrategy_derives_cost_basis_without_key() {
    let server = MockServer::start().await;
    mount_value(
        &server,
        "/api/v1/bitcoin/holdings",
        json!({ "totalInvestment": 16_500_000_000.0, "totalBitcoin": 330_000.0 }),
    )
    .await;

    let provider = MicroStrategyProvider::new(&settings(&server, None), TIMEOUT).unwrap();
    let snapshot = provider.fetch().await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot["costBasis"], 50_000.0);
}

#[tokio::test]
async fn non_success_status_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indicators/pi_cycle_top"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 1.0 })))
        .mount(&server)
        .await;

    let provider = PredictionProvider::new(&settings(&server, Some("p-key")), TIMEOUT).unwrap();
    let err = provider.fetch().await.unwrap_err();

    match err {
        ProviderError::Status { status, endpoint, .. } => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "/api/v1/indicators/pi_cycle_top");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let provider = MicroStrategyProvider::new(&settings(&server, None), TIMEOUT).unwrap();
    let err = provider.fetch().await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { .. }));
    assert_eq!(err.provider(), "MicroStrategy");
}

#[tokio::test]
async fn missing_settings_fail_at_construction() {
    let server = MockServer::start().await;

    let err = TradingViewProvider::new(&settings(&server, None), TIMEOUT).err().unwrap();
    assert!(matches!(err, ConfigurationError::MissingSetting { ref setting, .. } if setting == "TRADINGVIEW_API_KEY"));

    let no_url = ProviderSettings {
        base_url: None,
        api_key: Some("key".to_string()),
    };
    let err = PredictionProvider::new(&no_url, TIMEOUT).err().unwrap();
    assert!(matches!(err, ConfigurationError::MissingSetting { ref setting, .. } if setting == "PREDICTION_BASE_URL"));
}

#[tokio::test]
async fn build_providers_constructs_enabled_adapters_only() {
    let server = MockServer::start().await;
    let config = ProvidersConfig {
        enabled: vec![ProviderKind::MicroStrategy, ProviderKind::Glassnode],
        settings: HashMap::from([
            (ProviderKind::MicroStrategy, settings(&server, None)),
            (ProviderKind::Glassnode, settings(&server, Some("gn-key"))),
        ]),
    };

    let providers = build_providers(&config, TIMEOUT).unwrap();
    let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["microstrategy", "glassnode"]);

    let missing = ProvidersConfig {
        enabled: vec![ProviderKind::Coinglass],
        settings: HashMap::new(),
    };
    assert!(build_providers(&missing, TIMEOUT).is_err());
}
