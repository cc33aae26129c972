//! # Rate Resolution API
//!
//! - **GET `/v1/rates/interstate?origin=&destination=`**
//! - **GET `/v1/rates/adjusted-mva?original=&interstate=&destination_internal=`**
//!
//! Percent parameters accept `20.5`, `20,5` or `20,5%`.

use std::str::FromStr;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use icmsst_core::{Percent, UfCode};
use icmsst_pricing::{adjusted_mva, resolve_interstate, InterstateResolution};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterstateParams {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterstateResponse {
    pub origin: UfCode,
    pub destination: UfCode,
    #[serde(flatten)]
    pub resolution: InterstateResolution,
}

#[derive(Debug, Deserialize)]
pub struct AdjustedMvaParams {
    pub original: String,
    pub interstate: String,
    pub destination_internal: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustedMvaResponse {
    pub original: Percent,
    pub interstate: Percent,
    pub destination_internal: Percent,
    pub adjusted: Percent,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/rates/interstate", get(interstate))
        .route("/v1/rates/adjusted-mva", get(adjusted))
}

/// GET /v1/rates/interstate
async fn interstate(
    Query(params): Query<InterstateParams>,
) -> Result<Json<InterstateResponse>, AppError> {
    let origin = UfCode::new(&params.origin)?;
    let destination = UfCode::new(&params.destination)?;
    let resolution = resolve_interstate(&origin, &destination);
    if resolution.has_unrecognized_region() {
        tracing::warn!(
            origin = %origin,
            destination = %destination,
            "interstate rate resolved through the default bracket"
        );
    }
    Ok(Json(InterstateResponse {
        origin,
        destination,
        resolution,
    }))
}

/// GET /v1/rates/adjusted-mva
async fn adjusted(
    Query(params): Query<AdjustedMvaParams>,
) -> Result<Json<AdjustedMvaResponse>, AppError> {
    let original = parse_percent("original", &params.original)?;
    let interstate = parse_percent("interstate", &params.interstate)?;
    let destination_internal = parse_percent("destination_internal", &params.destination_internal)?;
    original.ensure_markup("original")?;
    interstate.ensure_in_range("interstate")?;
    destination_internal.ensure_in_range("destination_internal")?;
    Ok(Json(AdjustedMvaResponse {
        original,
        interstate,
        destination_internal,
        adjusted: adjusted_mva(original, interstate, destination_internal),
    }))
}

fn parse_percent(field: &str, raw: &str) -> Result<Percent, AppError> {
    Percent::from_str(raw)
        .map_err(|_| AppError::Validation(format!("{field}: \"{raw}\" is not a number")))
}
