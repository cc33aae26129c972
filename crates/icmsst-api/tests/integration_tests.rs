//! # Integration Tests for icmsst-api
//!
//! Drives the assembled router: health probes, the full pricing flow,
//! reference lookups feeding a simulation, and operator-supplied packs and
//! profiles.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use icmsst_api::state::{AppConfig, AppState};
use icmsst_core::{round_money, Decimal, Percent};
use icmsst_pricing::{RateNotice, SimulationReport};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    icmsst_api::app(AppState::new())
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health/liveness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health/readiness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app()
        .oneshot(Request::builder().uri("/v1/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Pricing ------------------------------------------------------------------

#[tokio::test]
async fn test_simulate_interstate_override_on_intrastate() {
    let response = test_app()
        .oneshot(post(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "100",
                "regime": "substituido",
                "origin": "SP",
                "destination": "SP",
                "mva": "32",
                "interstate_rate": "12",
                "icms_sale_rate": "18"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report: SimulationReport = serde_json::from_str(&body_string(response).await).unwrap();

    // 12% forced on an intrastate movement: reported, and used as given
    assert!(matches!(
        report.notices.as_slice(),
        [RateNotice::InterstateOverridden { .. }]
    ));
    assert_eq!(round_money(report.input.mva_adjusted.value()), Decimal::new(4166, 2));
    assert_eq!(report.result.entry_icms_credit, Decimal::from(12));
}

#[tokio::test]
async fn test_simulate_unrecognized_region_notice() {
    let response = test_app()
        .oneshot(post(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "500",
                "regime": "tributado",
                "origin": "ZZ",
                "destination": "SP",
                "destination_internal_rate": "18"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report: SimulationReport = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(report.input.interstate_rate, Percent::from(12));
    assert_eq!(report.notices.len(), 1);
    assert!(matches!(
        &report.notices[0],
        RateNotice::UnrecognizedRegion { uf, .. } if uf.as_str() == "ZZ"
    ));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/pricing/current")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Configured state ---------------------------------------------------------

#[tokio::test]
async fn test_operator_pack_and_profile() {
    let dir = tempfile::tempdir().unwrap();
    let pack = dir.path().join("pack.yaml");
    std::fs::write(
        &pack,
        "ncm:\n  - code: \"1234.56.78\"\n    description: Produto de teste\n    mva: \"50\"\n",
    )
    .unwrap();
    let profile = dir.path().join("profile.yaml");
    std::fs::write(&profile, "default_origin: SP\ntarget_result_rate: \"10\"\n").unwrap();

    let state = AppState::try_from_config(AppConfig {
        port: 0,
        profile_path: Some(profile),
        pack_path: Some(pack),
    })
    .unwrap();
    let app = icmsst_api::app(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/v1/reference/ncm").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(post(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "100",
                "regime": "substituido",
                "destination": "SP",
                "ncm": "12345678"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report: SimulationReport = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(report.input.origin.as_str(), "SP");
    assert_eq!(report.input.mva_original, Percent::from(50));
    assert_eq!(report.input.target_result_rate, Percent::from(10));
    // intrastate: no credit, MVA unadjusted, ST base 150
    assert_eq!(round_money(report.result.st_base), Decimal::from(150));
}
