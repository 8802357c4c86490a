mod common;

use common::{mock_config, MexcSignature};
use exvault::core::errors::{ErrorKind, ExchangeError};
use exvault::core::kernel::ReqwestRest;
use exvault::core::traits::{AccountInfo, Connectivity, OrderPlacer};
use exvault::exchanges::mexc::{build_connector, MexcConnector};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "mexc-key";
const SECRET: &str = "mexc-secret";

fn connector(server: &MockServer) -> MexcConnector<ReqwestRest> {
    build_connector(mock_config(KEY, SECRET, &server.uri())).unwrap()
}

async fn mount_spot_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/account"))
        .and(header("X-MEXC-APIKEY", KEY))
        .and(MexcSignature {
            secret: SECRET,
            timestamp_param: "timestamp",
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "canTrade": true,
            "balances": [
                {"asset": "BTC", "free": "0.10000000", "locked": "0.00000000"},
                {"asset": "MX", "free": "0", "locked": "0"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[cfg(test)]
mod mexc_tests {
    use super::*;

    #[tokio::test]
    async fn test_spot_and_contract_balances() {
        let server = MockServer::start().await;
        mount_spot_account(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/private/account/asset"))
            .and(query_param("currency", "USDT"))
            .and(MexcSignature {
                secret: SECRET,
                timestamp_param: "req_time",
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "code": 0,
                "data": {"currency": "USDT", "availableBalance": 57.5, "equity": 60}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let balances = connector(&server).get_account_balances().await.unwrap();
        assert_eq!(balances.get("spot_BTC"), Some(&dec!(0.1)));
        assert_eq!(balances.get("futures_USDT"), Some(&dec!(57.5)));
        assert!(!balances.contains_key("spot_MX"));
    }

    #[tokio::test]
    async fn test_contract_envelope_failure() {
        let server = MockServer::start().await;
        mount_spot_account(&server).await;

        Mock::given(path("/api/v1/private/account/asset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "code": 602,
                "message": "Signature verification failed!"
            })))
            .mount(&server)
            .await;

        let err = connector(&server).get_account_balances().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExchangeApi);
        assert!(err.to_string().contains("Signature verification failed!"));
    }

    #[tokio::test]
    async fn test_spot_http_error_message() {
        let server = MockServer::start().await;
        Mock::given(path("/api/v3/account"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 700002,
                "msg": "Signature for this request is not valid."
            })))
            .mount(&server)
            .await;

        let err = connector(&server).get_account_balances().await.unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::ApiError { code: 700_002, ref message, .. }
                if message == "Signature for this request is not valid."
        ));
    }

    #[tokio::test]
    async fn test_connection_checks_both_hosts() {
        let server = MockServer::start().await;
        Mock::given(path("/api/v3/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/api/v1/contract/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "code": 0,
                "data": 1_700_000_000_000_u64
            })))
            .expect(1)
            .mount(&server)
            .await;

        connector(&server).test_connection().await.unwrap();
    }

    #[tokio::test]
    async fn test_orders_are_not_implemented() {
        let server = MockServer::start().await;
        let err = connector(&server)
            .execute_order("market", "BTCUSDT", dec!(1), dec!(0))
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::NotImplemented(_)));
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
    }
}
