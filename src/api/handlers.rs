use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::debug;
use utoipa::OpenApi;

use super::{dto::SensorForm, errors::AppError, AppState};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Human-readable status page built around the latest snapshot report.
/// Reloads itself every 30 seconds.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Status page", content_type = "text/html", body = String),
    ),
    tag = "station"
)]
pub async fn status_page(State(state): State<AppState>) -> Html<String> {
    Html(state.status.render().await)
}

/// Entry point for the weather station.
///
/// A form body carrying `temperature` is an ingest: the reading replaces the
/// stored report and the response is an empty `200`. Any other body is
/// answered with the status page. Repeated keys keep their last value.
#[utoipa::path(
    post,
    path = "/",
    request_body(content = SensorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reading stored, or the status page for a non-ingest body"),
        (status = 500, description = "Snapshot report could not be written"),
    ),
    tag = "station"
)]
pub async fn submit(
    State(state): State<AppState>,
    pairs: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    match pairs.map(|Form(pairs)| pairs.into_iter().collect::<SensorForm>()) {
        Ok(form) if form.is_ingest() => {
            state.ingest.ingest(&form).await?;
            Ok(StatusCode::OK.into_response())
        }
        Ok(_) => Ok(status_page(State(state)).await.into_response()),
        Err(rejection) => {
            debug!(error = %rejection, "POST body is not a sensor form; serving status page");
            Ok(status_page(State(state)).await.into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(status_page, submit, health),
    components(schemas(SensorForm)),
    tags(
        (name = "station", description = "Weather station ingest and status page"),
        (name = "system",  description = "System endpoints"),
    ),
    info(
        title = "Weather Station Web",
        version = "0.1.0",
        description = "Receives weather station readings and serves the latest snapshot"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono_tz::Tz;
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::{
        api::{router, AppState},
        ingest::IngestService,
        report::ReportClock,
        report_store::ReportStore,
        status::{PageSettings, StatusService},
    };

    fn test_server(report_path: &Path) -> TestServer {
        let store = ReportStore::new(report_path);
        let ingest = IngestService::new(
            ReportClock::new(Tz::Australia__Sydney, "Sydney"),
            store.clone(),
            None,
        );
        let status = StatusService::new(
            store,
            PageSettings {
                label: "Sydney".to_owned(),
                zone: "Australia/Sydney".to_owned(),
                location: "North West Sydney, NSW, Australia".to_owned(),
                site_name: "Garage".to_owned(),
                offset_note: "Sydney time is UTC+10, or UTC+11 during DST.".to_owned(),
                dst_note: "DST runs from first Sunday of October.".to_owned(),
            },
        );
        TestServer::new(router(AppState::new(ingest, status))).unwrap()
    }

    fn server_in(dir: &TempDir) -> TestServer {
        test_server(&dir.path().join("temp_humidity.txt"))
    }

    const READING: &[(&str, &str)] = &[
        ("temperature", "21.5"),
        ("tempFar", "70.7"),
        ("timeStamp", "1700000000"),
        ("humidity", "55.2"),
        ("pressure", "1013.4"),
        ("ldr", "512"),
        ("maxTemp", "28.1"),
        ("minTemp", "12.3"),
        ("maxTempTimestamp", "1699999000"),
        ("minTempTimestamp", "1699950000"),
        ("minHumidity", "40.0"),
        ("maxHumidity", "80.5"),
        ("maxHumidityTimestamp", "1699960000"),
        ("minHumidityTimestamp", "1699990000"),
        ("minPressure", "1008.2"),
        ("maxPressure", "1016.9"),
        ("maxPressureTimestamp", "1699970000"),
        ("minPressureTimestamp", "1699980000"),
        ("uptime", "1699900000"),
        ("dewPoint", "12.1"),
        ("maxDewPoint", "15.0"),
        ("minDewPoint", "8.4"),
        ("maxDewPointTimestamp", "1699995000"),
        ("minDewPointTimestamp", "1699955000"),
        ("dewPointFeeling", "Comfortable"),
        ("sunrise", "05:48"),
        ("sunset", "19:31"),
        ("sunriseTomorrow", "05:47"),
        ("sunsetTomorrow", "19:32"),
    ];

    // -----------------------------------------------------------------------
    // GET /
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn page_before_any_ingest_has_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.get("/").await;
        resp.assert_status_ok();
        let body = resp.text();
        assert!(body.contains("<pre></pre>"));
        assert!(body.contains(r#"<meta http-equiv="refresh" content="30">"#));
    }

    #[tokio::test]
    async fn index_php_serves_the_same_page() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.get("/index.php").await;
        resp.assert_status_ok();
        assert!(resp.text().contains("<h2>Location: North West Sydney, NSW, Australia</h2>"));
    }

    // -----------------------------------------------------------------------
    // POST /
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn ingest_then_page_shows_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        server.post("/").form(READING).await.assert_status_ok();

        let body = server.get("/").await.text();
        for line in [
            "Sydney time:       09:13:20 15-Nov-2023 (Wed)",
            "UTC time:          22:13:20 14-Nov-2023 (Tue)",
            "Sunrise today:     05:48",
            "Sunset today:      19:31",
            "Sunrise tomorrow:  05:47",
            "Sunset tomorrow:   19:32",
            "Temperature:       21.5°C, 70.7°F",
            "Max. Temperature:  28.1°C @ 08:56:40 15-Nov-2023 (Wed)",
            "Min. Temperature:  12.3°C @ 19:20:00 14-Nov-2023 (Tue)",
            "Humidity:          55.2%",
            "Max. Humidity:     80.5% @ 22:06:40 14-Nov-2023 (Tue)",
            "Min. Humidity:     40.0% @ 06:26:40 15-Nov-2023 (Wed)",
            "Approx. Dew Point: 12.1°C Comfortable",
            "Max. Dew Point:    15.0°C @ 07:50:00 15-Nov-2023 (Wed)",
            "Min. Dew Point:    8.4°C @ 20:43:20 14-Nov-2023 (Tue)",
            "Pressure:          1013.4hPa",
            "Max. Pressure:     1016.9hPa @ 00:53:20 15-Nov-2023 (Wed)",
            "Min. Pressure:     1008.2hPa @ 03:40:00 15-Nov-2023 (Wed)",
            "Ambient Light:     512",
            "Arduino Restart:   05:26:40 14-Nov-2023 (Tue)",
        ] {
            assert!(body.contains(line), "missing line {line:?}");
        }
    }

    #[tokio::test]
    async fn ingest_response_is_empty_success() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.post("/index.php").form(READING).await;
        resp.assert_status_ok();
        assert!(resp.text().is_empty());
        assert!(dir.path().join("temp_humidity.txt").exists());
    }

    #[tokio::test]
    async fn repeated_ingest_gives_identical_report() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);
        let path = dir.path().join("temp_humidity.txt");

        server.post("/").form(READING).await.assert_status_ok();
        let first = std::fs::read_to_string(&path).unwrap();
        server.post("/").form(READING).await.assert_status_ok();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[tokio::test]
    async fn second_ingest_fully_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        server
            .post("/")
            .form(&[("temperature", "35.75"), ("dewPointFeeling", "Oppressive")])
            .await
            .assert_status_ok();
        server
            .post("/")
            .form(&[("temperature", "19.0")])
            .await
            .assert_status_ok();

        let body = server.get("/").await.text();
        assert!(body.contains("Temperature:       19.0°C, °F"));
        assert!(!body.contains("35.75"));
        assert!(!body.contains("Oppressive"));
    }

    #[tokio::test]
    async fn missing_field_renders_empty_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);
        let partial: Vec<_> = READING.iter().filter(|(k, _)| *k != "humidity").collect();

        server.post("/").form(&partial).await.assert_status_ok();

        let body = server.get("/").await.text();
        assert!(body.contains("Humidity:          %\n"));
        assert!(body.contains("Max. Humidity:     80.5% @ 22:06:40 14-Nov-2023 (Tue)"));
        assert!(body.contains("Temperature:       21.5°C, 70.7°F"));
    }

    #[tokio::test]
    async fn repeated_field_keeps_last_value_and_ingests() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server
            .post("/")
            .form(&[("temperature", "21.5"), ("humidity", "50"), ("humidity", "51")])
            .await;
        resp.assert_status_ok();
        assert!(resp.text().is_empty());
        assert!(dir.path().join("temp_humidity.txt").exists());

        let body = server.get("/").await.text();
        assert!(body.contains("Humidity:          51%\n"));
        assert!(body.contains("Temperature:       21.5°C, °F"));
    }

    #[tokio::test]
    async fn empty_temperature_still_counts_as_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.post("/").form(&[("temperature", "")]).await;
        resp.assert_status_ok();
        assert!(resp.text().is_empty());
        assert!(server.get("/").await.text().contains("Temperature:       °C, °F"));
    }

    #[tokio::test]
    async fn post_without_temperature_serves_page() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.post("/").form(&[("humidity", "50")]).await;
        resp.assert_status_ok();
        assert!(resp.text().contains("<pre></pre>"));
        assert!(!dir.path().join("temp_humidity.txt").exists());
    }

    #[tokio::test]
    async fn post_with_non_form_body_serves_page() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);

        let resp = server.post("/").text("temperature=21.5").await;
        resp.assert_status_ok();
        assert!(resp.text().contains("<pre></pre>"));
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(&dir.path().join("missing").join("temp_humidity.txt"));

        let resp = server.post("/").form(READING).await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains("staging file"));

        // The page still renders.
        let page = server.get("/").await;
        page.assert_status_ok();
        assert!(page.text().contains("<pre></pre>"));
    }

    // -----------------------------------------------------------------------
    // GET /health
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "ok");
    }

    // -----------------------------------------------------------------------
    // GET /api-docs/openapi.json
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(&dir);
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "Weather Station Web");
        assert!(body["components"]["schemas"]["SensorForm"].is_object());
    }
}
