#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use country_dashboard::{repo::Storage, routes::create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Points every upstream at the mock server, without retries.
pub fn config_for(server: &MockServer) -> Config {
    Config {
        countries_api_url: format!("{}/countries", server.uri()),
        currency_api_url: format!("{}/currency", server.uri()),
        weather_api_url: format!("{}/forecast", server.uri()),
        http_timeout_secs: 5,
        http_max_retries: 1,
        http_retry_delay_ms: 0,
        ..Config::default()
    }
}

pub fn app_state(server: &MockServer) -> AppState {
    AppState::new(config_for(server), Storage::memory()).unwrap()
}

pub fn router(state: &AppState) -> Router {
    create_router(state.clone())
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn norway() -> Value {
    json!([{
        "name": {"common": "Norway", "official": "Kingdom of Norway"},
        "cca2": "NO",
        "capital": ["Oslo"],
        "latlng": [62.0, 10.0],
        "population": 5379475,
        "area": 323802.0,
        "currencies": {"NOK": {"name": "Norwegian krone", "symbol": "kr"}}
    }])
}

pub fn bhutan() -> Value {
    json!([{
        "name": {"common": "Bhutan", "official": "Kingdom of Bhutan"},
        "cca2": "BT",
        "capital": ["Thimphu"],
        "latlng": [27.5, 90.5],
        "population": 771612,
        "area": 38394.0,
        "currencies": {
            "BTN": {"name": "Bhutanese ngultrum", "symbol": "Nu."},
            "INR": {"name": "Indian rupee", "symbol": "₹"}
        }
    }])
}

pub fn weather() -> Value {
    json!({
        "latitude": 62.0,
        "longitude": 10.0,
        "daily": {
            "time": ["2026-10-17", "2026-10-18", "2026-10-19"],
            "temperature_2m_mean": [2.0, 3.0, 4.0],
            "precipitation_probability_mean": [10.0, 20.0, 30.0]
        }
    })
}

pub fn rates(base: &str) -> Value {
    json!({
        "result": "success",
        "base_code": base,
        "time_last_update_utc": "Fri, 16 Oct 2026 00:02:31 +0000",
        "time_next_update_utc": "Sat, 17 Oct 2026 00:02:31 +0000",
        "rates": {"EUR": 0.085, "USD": 0.094, "GBP": 0.073}
    })
}

pub async fn mock_country(server: &MockServer, code: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/countries/alpha/{}", code)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mock_weather(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather()))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mock_rates(server: &MockServer, base: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/currency/{}", base)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates(base)))
        .expect(times)
        .mount(server)
        .await;
}
