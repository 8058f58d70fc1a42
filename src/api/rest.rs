// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
//   GET /                        service banner
//   GET /api/v1/health           liveness
//   GET /api/v1/prices/:symbol   OHLCV rows, optionally with indicators
//
// CORS is fully permissive; the dashboard is served from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::SeriesError;
use crate::frame::{price_rows, PriceRow};
use crate::market_data::HistoryRequest;
use crate::series::Series;

// =============================================================================
// Router construction
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health))
        .route("/api/v1/prices/:symbol", get(prices))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

/// Error body shape: `{"detail": "..."}`.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<SeriesError> for ApiError {
    fn from(err: SeriesError) -> Self {
        let status = match err {
            SeriesError::EmptySeries => StatusCode::NOT_FOUND,
            SeriesError::MalformedSeries { .. } => StatusCode::BAD_GATEWAY,
            SeriesError::ColumnLength { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

// =============================================================================
// Root & health
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "EGX Analytics API is running" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Prices
// =============================================================================

fn default_with_indicators() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
    #[serde(default = "default_with_indicators")]
    with_indicators: bool,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub symbol: String,
    pub mapped: String,
    pub rows: usize,
    pub data: Vec<PriceRow>,
}

async fn prices(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>, ApiError> {
    let mapped = state.symbols.resolve(&symbol);
    let request = HistoryRequest {
        period: query
            .period
            .unwrap_or_else(|| state.default_request.period.clone()),
        interval: query
            .interval
            .unwrap_or_else(|| state.default_request.interval.clone()),
    };

    let bars = state
        .fetcher
        .fetch(&mapped, &request)
        .await
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e.to_string()))?;

    let series = Series::ingest(bars).map_err(|e| {
        warn!(symbol = %symbol, mapped = %mapped, error = %e, "rejected market data");
        ApiError::from(e)
    })?;

    let data = if query.with_indicators {
        state.engine.compute(&series)?.to_rows()
    } else {
        price_rows(&series)
    };

    info!(
        symbol = %symbol,
        mapped = %mapped,
        rows = data.len(),
        with_indicators = query.with_indicators,
        "prices served"
    );

    Ok(Json(PriceResponse {
        symbol,
        mapped,
        rows: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::source::testing::StaticSource;
    use crate::market_data::MarketDataSource;
    use crate::runtime_config::RuntimeConfig;
    use crate::series::tests::daily_bars;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(source: StaticSource) -> Router {
        let source: Arc<dyn MarketDataSource> = Arc::new(source);
        router(Arc::new(AppState::new(&RuntimeConfig::default(), source)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_running() {
        let (status, body) = get(app(StaticSource::default()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "EGX Analytics API is running");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = get(app(StaticSource::default()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn prices_with_indicators() {
        let source = StaticSource::default()
            .with_history("CIB.CA", daily_bars(&[10.0, 11.0], &[100.0, 110.0]));
        let (status, body) = get(app(source), "/api/v1/prices/CIB").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "CIB");
        assert_eq!(body["mapped"], "CIB.CA");
        assert_eq!(body["rows"], 2);
        let row = &body["data"][1];
        assert_eq!(row["Close"], 11.0);
        assert_eq!(row["OBV"], 110.0);
        assert!(row["BB_upper"].is_null());
    }

    #[tokio::test]
    async fn prices_without_indicators() {
        let source = StaticSource::default()
            .with_history("CIB.CA", daily_bars(&[10.0, 11.0], &[100.0, 110.0]));
        let (status, body) =
            get(app(source), "/api/v1/prices/CIB?with_indicators=false").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"][0].get("RSI_14").is_none());
        assert_eq!(body["data"][0]["Open"], 10.0);
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let (status, body) = get(app(StaticSource::default()), "/api/v1/prices/NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "no data for symbol NOPE");
    }

    #[tokio::test]
    async fn malformed_upstream_series_is_bad_gateway() {
        let mut bars = daily_bars(&[10.0, 11.0], &[100.0, 110.0]);
        bars[1].timestamp = bars[0].timestamp;
        let source = StaticSource::default().with_history("ETEL.CA", bars);

        let (status, body) = get(app(source), "/api/v1/prices/ETEL").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"].as_str().unwrap().contains("row 1"));
    }
}
