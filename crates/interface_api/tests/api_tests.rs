//! Dashboard and JSON API tests
//!
//! Requests go through the full router with `axum-test`.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value as Json;
use std::sync::Arc;

use core_kernel::{Table, TableName, TableStore, Value};
use domain_claims::{columns, ProviderDirectory, RiskScorer};
use interface_api::handlers::dashboard::DASHBOARD_TITLE;
use interface_api::{create_router, AppState, ScreeningResults};
use test_utils::{in_memory_store, seeded_store, ClaimTableBuilder};

/// 103 claims: `C0` twice (score 4 each), 101 more from `PRV1` (score 2)
/// and one outlier from `PRV2` (score 3)
fn claims() -> Table {
    ClaimTableBuilder::new()
        .provider_claims("C", "PRV1", 101, 100)
        .claim("C0", "PRV1", 100)
        .claim("BIG", "PRV2", 100_000)
        .build()
}

fn providers() -> ProviderDirectory {
    let mut table = Table::new([columns::PROVIDER, columns::POTENTIAL_FRAUD]).unwrap();
    table.push_row(vec![Value::text("PRV1"), Value::text("Yes")]).unwrap();
    table.push_row(vec![Value::text("PRV2"), Value::text("No")]).unwrap();
    ProviderDirectory::from_table(&table)
}

fn results() -> ScreeningResults {
    let scoring = RiskScorer::new().score(&claims());
    ScreeningResults {
        claims: scoring.claims,
        report: Some(scoring.report),
        providers: providers(),
    }
}

async fn server() -> TestServer {
    let results = results();
    let store = seeded_store(&[(TableName::InpatientClaimsScored, results.claims.table())]).await;
    TestServer::new(create_router(AppState::new(results, store))).unwrap()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;
        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Json = response.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_with_snapshot() {
        let server = server().await;
        let response = server.get("/health/ready").await;

        response.assert_status_ok();
        let body: Json = response.json();
        assert_eq!(body["status"], "ready");
    }

    /// Readiness fails while the store holds no scored snapshot
    #[tokio::test]
    async fn test_readiness_without_snapshot() {
        let store: Arc<dyn TableStore> = in_memory_store().await;
        let server = TestServer::new(create_router(AppState::new(results(), store))).unwrap();

        let response = server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Json = response.json();
        assert_eq!(body["error"], "unavailable");
    }
}

mod claims_api {
    use super::*;

    #[tokio::test]
    async fn test_default_min_score() {
        let server = server().await;
        let response = server.get("/api/v1/claims").await;

        response.assert_status_ok();
        let body: Json = response.json();
        assert_eq!(body["min_score"], 3);
        assert_eq!(body["total_claims"], 103);
        assert_eq!(body["matched"], 3);

        let ids: Vec<&str> = body["claims"]
            .as_array()
            .unwrap()
            .iter()
            .map(|claim| claim["fields"]["ClaimID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["C0", "C0", "BIG"]);
    }

    #[tokio::test]
    async fn test_claim_record_fields() {
        let server = server().await;
        let body: Json = server
            .get("/api/v1/claims")
            .add_query_param("min_score", 4)
            .await
            .json();

        assert_eq!(body["matched"], 2);
        let first = &body["claims"][0];
        assert_eq!(first["position"], 0);
        assert_eq!(first["fraud_risk_score"], 4);
        assert_eq!(first["high_risk"], true);
        assert_eq!(first["potential_fraud"], true);
        assert_eq!(first["fields"]["InscClaimAmtReimbursed"], 100);
        assert_eq!(first["fields"]["fraud_risk_score"], 4);
    }

    #[tokio::test]
    async fn test_zero_threshold_returns_everything() {
        let server = server().await;
        let body: Json = server
            .get("/api/v1/claims")
            .add_query_param("min_score", 0)
            .await
            .json();

        assert_eq!(body["matched"], 103);
    }

    #[tokio::test]
    async fn test_scoring_summary() {
        let server = server().await;
        let body: Json = server.get("/api/v1/claims").await.json();

        let rules = body["scoring"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 3);
        for rule in rules {
            assert_eq!(rule["outcome"], "applied");
        }
        assert_eq!(rules[0]["flagged"], 1);
    }

    #[tokio::test]
    async fn test_out_of_range_min_score() {
        let server = server().await;
        for min_score in [-1, 11] {
            let response = server
                .get("/api/v1/claims")
                .add_query_param("min_score", min_score)
                .await;

            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            let body: Json = response.json();
            assert_eq!(body["error"], "validation_error");
        }
    }

    #[tokio::test]
    async fn test_non_numeric_min_score() {
        let server = server().await;
        let response = server
            .get("/api/v1/claims")
            .add_query_param("min_score", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Json = response.json();
        assert_eq!(body["error"], "bad_request");
    }
}

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_page() {
        let server = server().await;
        let response = server.get("/").await;

        response.assert_status_ok();
        let page = response.text();
        assert!(page.contains(DASHBOARD_TITLE));
        assert!(page.contains("type=\"range\""));
        assert!(page.contains("<td>BIG</td>"));
        assert!(!page.contains("<td>C1</td>"));
    }

    #[tokio::test]
    async fn test_dashboard_threshold_from_query() {
        let server = server().await;
        let page = server
            .get("/")
            .add_query_param("min_score", 2)
            .await
            .text();

        assert!(page.contains("value=\"2\""));
        assert!(page.contains("<td>C1</td>"));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_out_of_range_threshold() {
        let server = server().await;
        server
            .get("/")
            .add_query_param("min_score", 42)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
