//! Registry refresh behavior against a mock registry endpoint.

use std::sync::Arc;
use std::time::Duration;

use blinks_registry::{RegistryConfig, TrustCategory, TrustRegistry, TrustState};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> RegistryConfig {
    RegistryConfig {
        url: format!("{}/all", server.uri()),
        refresh_interval: Duration::from_secs(600),
    }
}

#[tokio::test]
async fn refresh_populates_all_three_tables() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actions": [{"host": "act.com", "state": "trusted"}],
            "websites": [{"host": "site.com", "state": "malicious"}],
            "interstitials": [{"host": "inter.com", "state": "trusted"}],
        })))
        .mount(&server)
        .await;

    let registry = TrustRegistry::new(config_for(&server));
    registry.refresh().await.unwrap();

    assert_eq!(
        registry.lookup("https://act.com", TrustCategory::Actions),
        TrustState::Trusted
    );
    assert_eq!(
        registry.lookup("https://site.com", TrustCategory::Websites),
        TrustState::Malicious
    );
    assert_eq!(
        registry.lookup("https://inter.com", TrustCategory::Interstitials),
        TrustState::Trusted
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_tables() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actions": [{"host": "act.com", "state": "trusted"}],
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = TrustRegistry::new(config_for(&server));
    registry.refresh().await.unwrap();
    assert_eq!(
        registry.lookup("https://act.com", TrustCategory::Actions),
        TrustState::Trusted
    );

    // Second refresh hits the 500; the previous tables must survive.
    let err = registry.refresh().await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert_eq!(
        registry.lookup("https://act.com", TrustCategory::Actions),
        TrustState::Trusted
    );
}

#[tokio::test]
async fn refresh_tolerates_unreachable_endpoint() {
    let registry = TrustRegistry::new(RegistryConfig {
        url: "http://127.0.0.1:1/all".into(),
        refresh_interval: Duration::from_secs(600),
    });
    assert!(registry.refresh().await.is_err());
    // Empty registry degrades to Unknown everywhere.
    assert_eq!(
        registry.lookup("https://anything.com", TrustCategory::Actions),
        TrustState::Unknown
    );
}

#[tokio::test]
async fn spawn_refresh_fetches_immediately_and_stops_on_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actions": [{"host": "act.com", "state": "trusted"}],
        })))
        .mount(&server)
        .await;

    let registry = Arc::new(TrustRegistry::new(config_for(&server)));
    let handle = registry.spawn_refresh();

    // The first tick fires immediately; poll until the table lands.
    let mut populated = false;
    for _ in 0..50 {
        if registry.lookup("https://act.com", TrustCategory::Actions) == TrustState::Trusted {
            populated = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(populated, "background refresh never populated the tables");

    handle.stop();
    for _ in 0..50 {
        if handle.is_finished() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("refresh loop did not stop");
}
