//! # Pricing API
//!
//! - **POST `/v1/pricing/simulate`**: draft in, resolved input, result,
//!   price matrix and rate notices out.
//! - **POST `/v1/pricing/current`**: fully resolved input straight into
//!   the current-regime engine.
//! - **POST `/v1/pricing/reform`**: reform draft in, 2027 projection out.
//! - **POST `/v1/pricing/matrix`**: price matrix for a given final cost.
//!
//! Amounts in responses are unrounded decimals serialized as strings.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use icmsst_core::error::ensure_amount;
use icmsst_pricing::{
    calculate_costs, generate_price_matrix, PriceMatrixRow, ReformDraft, ReformReport,
    SimulationDraft, SimulationInput, SimulationReport, SimulationResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::{check_simulation_input, extract_validated_json, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /v1/pricing/matrix`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub final_cost: Decimal,
    pub input: SimulationInput,
}

impl Validate for MatrixRequest {
    fn validate(&self) -> Result<(), String> {
        ensure_amount("final_cost", self.final_cost).map_err(|e| e.to_string())?;
        check_simulation_input(&self.input).map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/pricing/simulate", post(simulate))
        .route("/v1/pricing/current", post(current))
        .route("/v1/pricing/reform", post(reform))
        .route("/v1/pricing/matrix", post(matrix))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/pricing/simulate
async fn simulate(
    State(state): State<AppState>,
    body: Result<Json<SimulationDraft>, JsonRejection>,
) -> Result<Json<SimulationReport>, AppError> {
    let draft = extract_validated_json(body)?;
    let report = state.simulator().run(&draft)?;
    tracing::debug!(
        regime = report.input.regime.as_str(),
        destination = %report.input.destination,
        notices = report.notices.len(),
        "simulation computed"
    );
    Ok(Json(report))
}

/// POST /v1/pricing/current
async fn current(
    body: Result<Json<SimulationInput>, JsonRejection>,
) -> Result<Json<SimulationResult>, AppError> {
    let input = extract_validated_json(body)?;
    Ok(Json(calculate_costs(&input)))
}

/// POST /v1/pricing/reform
async fn reform(
    State(state): State<AppState>,
    body: Result<Json<ReformDraft>, JsonRejection>,
) -> Result<Json<ReformReport>, AppError> {
    let draft = extract_validated_json(body)?;
    Ok(Json(state.simulator().run_reform(&draft)?))
}

/// POST /v1/pricing/matrix
async fn matrix(
    body: Result<Json<MatrixRequest>, JsonRejection>,
) -> Result<Json<Vec<PriceMatrixRow>>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(generate_price_matrix(req.final_cost, &req.input)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use icmsst_core::{round_money, Percent};
    use tower::ServiceExt;

    fn test_app() -> Router {
        super::router().with_state(AppState::new())
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn resolved_input() -> serde_json::Value {
        serde_json::json!({
            "purchase_value": "100",
            "freight_ipi": "0",
            "mva_original": "32",
            "mva_adjusted": "32",
            "interstate_rate": "12",
            "destination_internal_rate": "18",
            "pis_cofins_entry_rate": "9.25",
            "pis_cofins_sale_rate": "9.25",
            "icms_sale_rate": "18",
            "commission_rate": "3",
            "other_variable_cost_rate": "2",
            "fixed_cost_rate": "10",
            "target_result_rate": "8",
            "regime": "substituido",
            "origin": "PR",
            "destination": "SP"
        })
    }

    #[tokio::test]
    async fn simulate_resolves_and_computes() {
        let (status, body) = post_json(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "100",
                "regime": "substituido",
                "origin": "PR",
                "destination": "SP",
                "ncm": "8708.99.90"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let report: SimulationReport = serde_json::from_slice(&body).unwrap();
        assert_eq!(report.input.interstate_rate, Percent::from(12));
        assert_eq!(report.input.mva_original, Percent::from_parts(7178, 2));
        assert_eq!(report.matrix.len(), 5);
        assert!(report.notices.is_empty());
        assert!(report.result.st_payable > Decimal::ZERO);
    }

    #[tokio::test]
    async fn simulate_unknown_ncm_is_422() {
        let (status, body) = post_json(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "100",
                "regime": "substituido",
                "origin": "PR",
                "destination": "SP",
                "ncm": "0000.00.00"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("VALIDATION_ERROR"));
        assert!(text.contains("0000.00.00"));
    }

    #[tokio::test]
    async fn simulate_negative_purchase_is_422() {
        let (status, _) = post_json(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "-1",
                "regime": "tributado",
                "origin": "PR",
                "destination": "SP"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn simulate_unknown_regime_is_400() {
        let (status, body) = post_json(
            "/v1/pricing/simulate",
            serde_json::json!({
                "purchase_value": "100",
                "regime": "simples",
                "destination": "SP"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("BAD_REQUEST"));
    }

    #[tokio::test]
    async fn current_matches_worked_example() {
        let (status, body) = post_json("/v1/pricing/current", resolved_input()).await;
        assert_eq!(status, StatusCode::OK);
        let result: SimulationResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.st_base, Decimal::from(132));
        assert_eq!(result.gross_st, Decimal::new(2376, 2));
        assert_eq!(result.st_payable, Decimal::new(1176, 2));
        assert_eq!(round_money(result.target_sale_price), Decimal::new(20605, 2));
    }

    #[tokio::test]
    async fn current_rejects_out_of_range_rate() {
        let mut input = resolved_input();
        input["fixed_cost_rate"] = serde_json::json!("120");
        let (status, _) = post_json("/v1/pricing/current", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    fn near_total_fixed_cost() -> serde_json::Value {
        let mut input = resolved_input();
        input["fixed_cost_rate"] = serde_json::json!("99.99999999999999999999999999");
        for field in [
            "pis_cofins_sale_rate",
            "icms_sale_rate",
            "commission_rate",
            "other_variable_cost_rate",
            "target_result_rate",
        ] {
            input[field] = serde_json::json!("0");
        }
        input
    }

    #[tokio::test]
    async fn current_near_total_fixed_cost_prices_at_zero() {
        let (status, body) = post_json("/v1/pricing/current", near_total_fixed_cost()).await;
        assert_eq!(status, StatusCode::OK);
        let result: SimulationResult = serde_json::from_slice(&body).unwrap();
        assert!(result.total_deductions_with_margin < Percent::HUNDRED);
        assert_eq!(result.target_sale_price, Decimal::ZERO);
        assert_eq!(result.break_even_price, Decimal::ZERO);
        assert_eq!(result.total_taxes, result.st_payable);
    }

    #[tokio::test]
    async fn matrix_near_total_fixed_cost_is_ok() {
        let (status, body) = post_json(
            "/v1/pricing/matrix",
            serde_json::json!({ "final_cost": "1000", "input": near_total_fixed_cost() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows: Vec<PriceMatrixRow> = serde_json::from_slice(&body).unwrap();
        assert!(rows.iter().all(|r| r.base_price == Decimal::ZERO));
    }

    #[tokio::test]
    async fn current_rejects_oversized_amount_and_markup() {
        let mut input = resolved_input();
        input["purchase_value"] = serde_json::json!("100000000000000000000");
        let (status, body) = post_json("/v1/pricing/current", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8(body).unwrap().contains("purchase_value"));

        let mut input = resolved_input();
        input["mva_adjusted"] = serde_json::json!("5000000");
        let (status, body) = post_json("/v1/pricing/current", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8(body).unwrap().contains("mva_adjusted"));
    }

    #[tokio::test]
    async fn reform_needs_origin_without_profile_default() {
        let (status, body) = post_json(
            "/v1/pricing/reform",
            serde_json::json!({ "purchase_value": "1000", "destination": "BA" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8(body).unwrap().contains("origin"));
    }

    #[tokio::test]
    async fn reform_projection() {
        let (status, body) = post_json(
            "/v1/pricing/reform",
            serde_json::json!({
                "purchase_value": "1000",
                "freight_value": "50",
                "ipi_rate": "10",
                "origin": "SP",
                "destination": "BA"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let report: ReformReport = serde_json::from_slice(&body).unwrap();
        assert_eq!(report.result.total_iva_rate, Percent::from_parts(265, 1));
        assert_eq!(report.result.target_sale_price, Decimal::new(178133, 2));
    }

    #[tokio::test]
    async fn matrix_returns_five_tiers() {
        let (status, body) = post_json(
            "/v1/pricing/matrix",
            serde_json::json!({ "final_cost": "102.51", "input": resolved_input() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows: Vec<PriceMatrixRow> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].label, "Agressiva");
        assert_eq!(round_money(rows[0].base_price), Decimal::new(20605, 2));
    }
}
