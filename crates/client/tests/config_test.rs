use std::time::Duration;

use barbershop_client::config::{ClientConfig, parse_log_level};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;

fn config(token: Option<&str>) -> ClientConfig {
    ClientConfig {
        api_base_url: "https://api.example.com/api".to_string(),
        shop_id: "shop-42".to_string(),
        api_token: token.map(str::to_string),
        log_level: Level::INFO,
        request_timeout: 12,
    }
}

#[rstest]
#[case("trace", Level::TRACE)]
#[case("DEBUG", Level::DEBUG)]
#[case(" warn ", Level::WARN)]
#[case("error", Level::ERROR)]
#[case("verbose", Level::INFO)]
#[case("", Level::INFO)]
fn test_parse_log_level(#[case] raw: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(raw), expected);
}

#[test]
fn test_session_with_token() {
    let session = config(Some("secret")).session();

    assert_eq!(session.shop_id, "shop-42");
    assert_eq!(session.access_token.as_deref(), Some("secret"));
    assert!(session.is_authenticated());
}

#[test]
fn test_session_without_token_is_public() {
    let session = config(None).session();

    assert_eq!(session.shop_id, "shop-42");
    assert!(!session.is_authenticated());
}

#[test]
fn test_timeout() {
    assert_eq!(config(None).timeout(), Duration::from_secs(12));
}
