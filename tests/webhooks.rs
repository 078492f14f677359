mod common;

use axum::http::{Method, StatusCode};
use country_dashboard::{
    domain::{WebhookInvocation, WebhookSubscription},
    repo::{MemorySubscriptionStore, SubscriptionStore},
    services::WebhookDispatcher,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use common::*;

async fn receiver(server: &MockServer, route: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

async fn subscribe(store: &MemorySubscriptionStore, url: String, country: &str, event: &str) -> String {
    store
        .insert(WebhookSubscription {
            id: String::new(),
            url,
            country: country.into(),
            event: event.into(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn only_matching_subscriptions_are_called() {
    let hooks = MockServer::start().await;
    receiver(&hooks, "/any", 200, 1).await;
    receiver(&hooks, "/norway", 200, 1).await;
    receiver(&hooks, "/sweden", 200, 0).await;
    receiver(&hooks, "/deletes", 200, 0).await;

    let store = Arc::new(MemorySubscriptionStore::new());
    let any_id = subscribe(&store, format!("{}/any", hooks.uri()), "", "INVOKE").await;
    subscribe(&store, format!("{}/norway", hooks.uri()), "no", "invoke").await;
    subscribe(&store, format!("{}/sweden", hooks.uri()), "SE", "INVOKE").await;
    subscribe(&store, format!("{}/deletes", hooks.uri()), "", "DELETE").await;

    let dispatcher = WebhookDispatcher::new(store, reqwest::Client::new());
    let handles = dispatcher.dispatch("INVOKE", "NO").await.unwrap();
    assert_eq!(handles.len(), 2);
    for handle in handles {
        handle.await.unwrap();
    }

    let requests = hooks.received_requests().await.unwrap();
    let wildcard = requests
        .iter()
        .find(|r| r.url.path() == "/any")
        .unwrap();
    let payload: WebhookInvocation = serde_json::from_slice(&wildcard.body).unwrap();
    assert_eq!(payload.id, any_id);
    // Wildcard subscriptions get their own empty country back
    assert_eq!(payload.country, "");
    assert_eq!(payload.event, "INVOKE");
    assert!(chrono::DateTime::parse_from_rfc3339(&payload.time).is_ok());

    let specific = requests
        .iter()
        .find(|r| r.url.path() == "/norway")
        .unwrap();
    let payload: WebhookInvocation = serde_json::from_slice(&specific.body).unwrap();
    assert_eq!(payload.country, "no");
}

#[tokio::test]
async fn failing_receiver_does_not_block_the_others() {
    let hooks = MockServer::start().await;
    receiver(&hooks, "/broken", 500, 1).await;
    receiver(&hooks, "/working", 200, 1).await;

    let store = Arc::new(MemorySubscriptionStore::new());
    subscribe(&store, format!("{}/broken", hooks.uri()), "", "REGISTER").await;
    subscribe(&store, "http://127.0.0.1:9/unreachable".into(), "", "REGISTER").await;
    subscribe(&store, format!("{}/working", hooks.uri()), "", "REGISTER").await;

    let dispatcher = WebhookDispatcher::new(store, reqwest::Client::new());
    let handles = dispatcher.dispatch("REGISTER", "SE").await.unwrap();
    assert_eq!(handles.len(), 3);
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn registering_a_dashboard_notifies_subscribers() {
    let upstreams = MockServer::start().await;
    let hooks = MockServer::start().await;
    receiver(&hooks, "/registered", 200, 1).await;

    let app = router(&app_state(&upstreams));

    let (status, _) = send(
        &app,
        Method::POST,
        "/dashboard/v1/notifications",
        Some(json!({
            "url": format!("{}/registered", hooks.uri()),
            "country": "NO",
            "event": "REGISTER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/dashboard/v1/registrations",
        Some(json!({"country": "Norway", "isoCode": "NO"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Delivery runs in the background, wait for it to land
    let mut delivered = Vec::new();
    for _ in 0..50 {
        delivered = hooks.received_requests().await.unwrap();
        if !delivered.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(delivered.len(), 1);

    let payload: WebhookInvocation = serde_json::from_slice(&delivered[0].body).unwrap();
    assert_eq!(payload.event, "REGISTER");
    assert_eq!(payload.country, "NO");

    let (_, hooks_listed) = send(&app, Method::GET, "/dashboard/v1/notifications", None).await;
    assert_eq!(payload.id, hooks_listed[0]["id"].as_str().unwrap());
}

#[tokio::test]
async fn notification_lifecycle() {
    let server = MockServer::start().await;
    let app = router(&app_state(&server));

    let (status, created) = send(
        &app,
        Method::POST,
        "/dashboard/v1/notifications/",
        Some(json!({"url": "http://localhost:9000/hook", "event": "invoke"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/dashboard/v1/notifications/{}", id);

    let (status, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["event"], "INVOKE");
    assert_eq!(stored["country"], "");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"country": "SE"}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed) = send(&app, Method::GET, "/dashboard/v1/notifications", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["country"], "SE");
    assert_eq!(listed[0]["url"], "http://localhost:9000/hook");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_event_is_rejected() {
    let server = MockServer::start().await;
    let app = router(&app_state(&server));

    let (status, body) = send(
        &app,
        Method::POST,
        "/dashboard/v1/notifications",
        Some(json!({"url": "http://localhost:9000/hook", "event": "EXPLODE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/dashboard/v1/notifications",
        Some(json!({"url": "ftp://localhost/hook", "event": "INVOKE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_reports_upstreams_and_webhook_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/countries/alpha/no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(norway()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/currency/NOK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates("NOK")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = router(&app_state(&server));
    send(
        &app,
        Method::POST,
        "/dashboard/v1/notifications",
        Some(json!({"url": "http://localhost:9000/hook", "event": "DELETE"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/dashboard/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countriesApi"], 200);
    assert_eq!(body["currencyApi"], 200);
    assert_eq!(body["meteoApi"], 500);
    assert_eq!(body["notificationDb"], 200);
    assert_eq!(body["webhooks"], 1);
    assert_eq!(body["version"], "v1");
    assert!(body["uptime"].as_str().unwrap().starts_with("0d:"));
}
