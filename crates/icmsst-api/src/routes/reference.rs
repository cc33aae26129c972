//! # Reference Data API
//!
//! Read-only views over the loaded reference pack.
//!
//! - **GET `/v1/reference/ncm?q=`**: whole catalog, or matches for `q`
//!   (code prefix or description text).
//! - **GET `/v1/reference/ncm/{code}`**
//! - **GET `/v1/reference/uf`**
//! - **GET `/v1/reference/uf/{code}`**

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use icmsst_core::{NcmCode, UfCode};
use icmsst_pack::{NcmEntry, UfEntry};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NcmQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/reference/ncm", get(list_ncm))
        .route("/v1/reference/ncm/{code}", get(get_ncm))
        .route("/v1/reference/uf", get(list_uf))
        .route("/v1/reference/uf/{code}", get(get_uf))
}

/// GET /v1/reference/ncm
async fn list_ncm(
    State(state): State<AppState>,
    Query(params): Query<NcmQuery>,
) -> Json<Vec<NcmEntry>> {
    let query = params.q.unwrap_or_default();
    Json(state.pack.ncm.search(&query).into_iter().cloned().collect())
}

/// GET /v1/reference/ncm/{code}
async fn get_ncm(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<NcmEntry>, AppError> {
    let code = NcmCode::new(&code)?;
    state
        .pack
        .ncm
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("NCM {code} not in catalog")))
}

/// GET /v1/reference/uf
async fn list_uf(State(state): State<AppState>) -> Json<Vec<UfEntry>> {
    Json(state.pack.uf.iter().cloned().collect())
}

/// GET /v1/reference/uf/{code}
async fn get_uf(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UfEntry>, AppError> {
    let code = UfCode::new(&code)?;
    state
        .pack
        .uf
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("UF {code} not in table")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use icmsst_core::Percent;
    use tower::ServiceExt;

    async fn get_uri(uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = super::router()
            .with_state(AppState::new())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn list_whole_catalog() {
        let (status, body) = get_uri("/v1/reference/ncm").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<NcmEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), AppState::new().pack.ncm.len());
    }

    #[tokio::test]
    async fn search_by_prefix() {
        let (_, body) = get_uri("/v1/reference/ncm?q=8708").await;
        let entries: Vec<NcmEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn search_by_description() {
        let (_, body) = get_uri("/v1/reference/ncm?q=pneus").await;
        let entries: Vec<NcmEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code.dotted(), "4011.10.00");
    }

    #[tokio::test]
    async fn get_ncm_accepts_both_forms() {
        for uri in ["/v1/reference/ncm/87089990", "/v1/reference/ncm/8708.99.90"] {
            let (status, body) = get_uri(uri).await;
            assert_eq!(status, StatusCode::OK);
            let entry: NcmEntry = serde_json::from_slice(&body).unwrap();
            assert_eq!(entry.mva, Percent::from_parts(7178, 2));
        }
    }

    #[tokio::test]
    async fn get_ncm_not_found() {
        let (status, body) = get_uri("/v1/reference/ncm/00000000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().contains("NOT_FOUND"));
    }

    #[tokio::test]
    async fn get_ncm_malformed() {
        let (status, _) = get_uri("/v1/reference/ncm/87").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn uf_table() {
        let (status, body) = get_uri("/v1/reference/uf").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<UfEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 27);

        let (status, body) = get_uri("/v1/reference/uf/ba").await;
        assert_eq!(status, StatusCode::OK);
        let entry: UfEntry = serde_json::from_slice(&body).unwrap();
        assert_eq!(entry.internal_rate, Percent::from_parts(205, 1));

        let (status, _) = get_uri("/v1/reference/uf/XX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
