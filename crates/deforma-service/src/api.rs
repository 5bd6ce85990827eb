//! REST API endpoints for the deforma service.
//!
//! Three read endpoints run against the store: raw filtered readings,
//! per-period extremes, and a rendered line chart. Handlers acquire
//! the `state.store` mutex only for the duration of their query.
//!
//! All error responses are structured JSON via [`AppError`]: client
//! errors return 400 with an `{"error": message}` body, store and
//! rendering failures return 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use deforma_store::{PeriodExtremes, Reading, ReadingFilter};
use deforma_types::{Period, parse_timestamp};

use crate::chart::{self, ChartError};
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/data", get(get_data))
        .route("/extremes", get(get_extremes))
        .route("/graph", get(plot_graph))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Query parameters for raw readings.
#[derive(Debug, Deserialize, Default)]
pub struct DataQuery {
    pub sensor: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Get raw readings.
///
/// All filters are optional and combined with AND; no filters returns
/// the entire table. The full result set is always returned.
async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataQuery>,
) -> Result<Json<Vec<Reading>>, AppError> {
    let mut filter = ReadingFilter::new();
    if let Some(ref sensor) = params.sensor {
        filter = filter.sensor(sensor);
    }
    if let Some(ref start) = params.start_date {
        filter = filter.since(start);
    }
    if let Some(ref end) = params.end_date {
        filter = filter.until(end);
    }

    let store = state.store.lock().await;
    let readings = store.query_readings(&filter)?;
    Ok(Json(readings))
}

/// Query parameters for extremes.
#[derive(Debug, Deserialize, Default)]
pub struct ExtremesQuery {
    pub sensor: Option<String>,
    pub period: Option<String>,
}

/// Get per-period min/max values for one sensor.
///
/// An unsupplied period means `day`. A period outside the supported
/// set is a 400; a sensor with no stored rows yields an empty array.
async fn get_extremes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtremesQuery>,
) -> Result<Json<Vec<PeriodExtremes>>, AppError> {
    let period = match params.period.as_deref() {
        None => Period::default(),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid period".to_string()))?,
    };

    let Some(sensor) = params.sensor else {
        return Ok(Json(Vec::new()));
    };

    let store = state.store.lock().await;
    let extremes = store.extremes(&sensor, period)?;
    Ok(Json(extremes))
}

/// Query parameters for the chart.
#[derive(Debug, Deserialize, Default)]
pub struct GraphQuery {
    pub sensor: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Render a line chart of one sensor's values in a time range.
///
/// Missing parameters or an empty range are "no data"; stored rows
/// whose timestamps fail strict parsing are dropped, and if nothing
/// survives the response is the distinct "all dates invalid" error.
async fn plot_graph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(sensor), Some(start), Some(end)) =
        (params.sensor, params.start_date, params.end_date)
    else {
        return Err(AppError::NoData);
    };

    let points = {
        let store = state.store.lock().await;
        store.series(&sensor, &start, &end)?
    };
    if points.is_empty() {
        return Err(AppError::NoData);
    }

    let valid: Vec<(String, f64)> = points
        .into_iter()
        .filter(|(time, _)| parse_timestamp(time).is_ok())
        .collect();
    if valid.is_empty() {
        return Err(AppError::AllDatesInvalid);
    }

    let png = chart::render_png(&sensor, &valid)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NoData,
    AllDatesInvalid,
    Store(deforma_store::Error),
    Chart(ChartError),
}

impl From<deforma_store::Error> for AppError {
    fn from(e: deforma_store::Error) -> Self {
        AppError::Store(e)
    }
}

impl From<ChartError> for AppError {
    fn from(e: ChartError) -> Self {
        AppError::Chart(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NoData => (StatusCode::BAD_REQUEST, "no data".to_string()),
            AppError::AllDatesInvalid => (StatusCode::BAD_REQUEST, "all dates invalid".to_string()),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Chart(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use deforma_store::Store;

    use crate::config::Config;

    fn reading(time: &str, sensor: &str, value: f64) -> Reading {
        Reading {
            time: time.to_string(),
            sensor: sensor.to_string(),
            value,
        }
    }

    fn test_state(readings: &[Reading]) -> Arc<AppState> {
        let mut store = Store::open_in_memory().unwrap();
        store.insert_readings(readings).unwrap();
        AppState::new(store, Config::default())
    }

    fn sample_readings() -> Vec<Reading> {
        vec![
            reading("2024-01-01 00:00:00", "S1", 12.5),
            reading("2024-01-01 08:15:00", "S1", -3.0),
            reading("2024-01-02 10:00:00", "S1", 7.25),
            reading("2024-01-01 08:15:00", "S2", 100.0),
        ]
    }

    async fn do_get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn response_body(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&response_body(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router().with_state(test_state(&[]));
        let response = do_get(app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_data_empty_store() {
        let app = router().with_state(test_state(&[]));
        let response = do_get(app, "/data").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_data_no_filters_returns_everything() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/data").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["time"], "2024-01-01 00:00:00");
        assert_eq!(rows[0]["sensor"], "S1");
        assert_eq!(rows[0]["value"], 12.5);
    }

    #[tokio::test]
    async fn test_data_sensor_filter() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/data?sensor=S2").await;

        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["value"], 100.0);
    }

    #[tokio::test]
    async fn test_data_exact_instant_is_inclusive_both_sides() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(
            app,
            "/data?sensor=S1&start_date=2024-01-01%2000:00:00&end_date=2024-01-01%2000:00:00",
        )
        .await;

        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["sensor"], "S1");
        assert_eq!(rows[0]["time"], "2024-01-01 00:00:00");
    }

    #[tokio::test]
    async fn test_extremes_invalid_period() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/extremes?period=century&sensor=S1").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Invalid period");
    }

    #[tokio::test]
    async fn test_extremes_single_reading_min_equals_max() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/extremes?sensor=S2&period=day").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["sensor"], "S2");
        assert_eq!(rows[0]["min_value"], 100.0);
        assert_eq!(rows[0]["max_value"], 100.0);
    }

    #[tokio::test]
    async fn test_extremes_unsupplied_period_means_day() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/extremes?sensor=S1").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["period"], "2024-01-01");
        assert_eq!(rows[0]["min_value"], -3.0);
        assert_eq!(rows[0]["max_value"], 12.5);
        assert_eq!(rows[1]["period"], "2024-01-02");
    }

    #[tokio::test]
    async fn test_extremes_unknown_sensor_is_empty_not_error() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/extremes?sensor=missing&period=hour").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extremes_missing_sensor_is_empty() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/extremes?period=day").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_graph_empty_range_is_no_data() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(
            app,
            "/graph?sensor=S1&start_date=2099-01-01%2000:00:00&end_date=2099-01-02%2000:00:00",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "no data");
    }

    #[tokio::test]
    async fn test_graph_missing_params_is_no_data() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(app, "/graph?sensor=S1").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "no data");
    }

    #[tokio::test]
    async fn test_graph_all_dates_invalid() {
        let app = router().with_state(test_state(&[reading("garbage", "S1", 1.0)]));
        let response = do_get(app, "/graph?sensor=S1&start_date=a&end_date=z").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "all dates invalid");
    }

    #[tokio::test]
    async fn test_graph_renders_png() {
        let app = router().with_state(test_state(&sample_readings()));
        let response = do_get(
            app,
            "/graph?sensor=S1&start_date=2024-01-01%2000:00:00&end_date=2024-01-02%2023:59:59",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = response_body(response).await;
        assert_eq!(&body[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_graph_drops_unparseable_rows_but_renders_the_rest() {
        let mut readings = sample_readings();
        // Lexically inside the range, but not a real date.
        readings.push(reading("2024-06-31 10:00:00", "S1", 5.0));
        let app = router().with_state(test_state(&readings));

        let response = do_get(
            app,
            "/graph?sensor=S1&start_date=2024-01-01%2000:00:00&end_date=2024-12-31%2023:59:59",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }
}
