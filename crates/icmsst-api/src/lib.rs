//! # icmsst-api — HTTP Service for ICMS-ST Pricing
//!
//! Exposes the pricing engines, the rate resolver and the reference pack
//! over JSON. The service is stateless between requests: every handler reads
//! the shared pack and profile and computes its answer from the request.
//!
//! ## API Surface
//!
//! | Prefix              | Module                  | Domain                      |
//! |---------------------|-------------------------|-----------------------------|
//! | `/v1/pricing/*`     | [`routes::pricing`]     | Simulations, engines, matrix|
//! | `/v1/rates/*`       | [`routes::rates`]       | Interstate rate, MVA        |
//! | `/v1/reference/*`   | [`routes::reference`]   | NCM catalog, UF table       |
//! | `/health/*`         | this module             | Probes                      |

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::pricing::router())
        .merge(routes::rates::router())
        .merge(routes::reference::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the pack and profile are loaded before the router
/// exists, so a running router is ready.
async fn readiness() -> &'static str {
    "ready"
}
