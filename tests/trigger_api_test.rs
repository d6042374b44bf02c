//! # 触发接口集成测试
//!
//! 通过 `tower::ServiceExt::oneshot` 直接驱动路由，覆盖认证、手动触发和状态查询

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{RecordingSender, TEST_SECRET, app_context, insert_cron_job, insert_monitor, setup_db};
use entity::monitor_checks;
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use smithkit_monitor::management::server::create_router;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn post(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn healthy_target() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ping_needs_no_secret() {
    let router = create_router(app_context(setup_db().await, Arc::new(RecordingSender::default())));
    let (status, body) = send(&router, get("/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
}

#[tokio::test]
async fn batch_check_rejects_missing_or_wrong_bearer() {
    let server = healthy_target().await;
    let db = setup_db().await;
    insert_monitor(&db, "Site", &server.uri(), 200, None).await;
    let context = app_context(db, Arc::new(RecordingSender::default()));
    let router = create_router(Arc::clone(&context));

    let (status, body) = send(&router, post("/api/monitors/check", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body = json_body(&body);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));

    let (status, _) = send(&router, post("/api/monitors/check", Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, post("/api/cron/execute", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 未授权调用不做任何检查
    let checks = monitor_checks::Entity::find().count(&*context.db).await.unwrap();
    assert_eq!(checks, 0);
}

#[tokio::test]
async fn batch_check_returns_summary() {
    let server = healthy_target().await;
    let db = setup_db().await;
    let monitor = insert_monitor(&db, "Site", &server.uri(), 200, None).await;
    let router = create_router(app_context(db, Arc::new(RecordingSender::default())));

    let (status, body) = send(&router, post("/api/monitors/check", Some(TEST_SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["executed"], json!(1));
    assert_eq!(body["succeeded"], json!(1));
    assert_eq!(body["failed"], json!(0));
    assert_eq!(body["results"][0]["target_id"], json!(monitor.id));
    assert_eq!(body["results"][0]["status"], json!("up"));
}

#[tokio::test]
async fn cron_execute_returns_summary() {
    let server = healthy_target().await;
    let db = setup_db().await;
    insert_cron_job(&db, "sync", &server.uri(), "*/10 * * * *", None, true).await;
    let router = create_router(app_context(db, Arc::new(RecordingSender::default())));

    let (status, body) = send(&router, post("/api/cron/execute", Some(TEST_SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["executed"], json!(1));
    assert_eq!(body["results"][0]["status"], json!("success"));
}

#[tokio::test]
async fn manual_triggers_use_query_secret() {
    let server = healthy_target().await;
    let db = setup_db().await;
    let monitor = insert_monitor(&db, "Site", &server.uri(), 200, None).await;
    let job = insert_cron_job(&db, "sync", &server.uri(), "0 * * * *", None, true).await;
    let router = create_router(app_context(db, Arc::new(RecordingSender::default())));

    let uri = format!("/api/monitors/trigger?monitor_id={}&secret={TEST_SECRET}", monitor.id);
    let (status, body) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "up", "monitor_id": monitor.id}));

    let uri = format!("/api/cron/trigger?job_id={}&secret={TEST_SECRET}", job.id);
    let (status, body) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "success", "job_id": job.id}));

    let uri = format!("/api/cron/trigger?job_id={}", job.id);
    let (status, _) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let uri = format!("/api/monitors/trigger?monitor_id={}&secret=nope", monitor.id);
    let (status, _) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn manual_trigger_of_unknown_target_is_404() {
    let router = create_router(app_context(setup_db().await, Arc::new(RecordingSender::default())));

    let uri = format!("/api/monitors/trigger?monitor_id=999&secret={TEST_SECRET}");
    let (status, body) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"]["code"], json!("RESOURCE_NOT_FOUND"));

    let uri = format!("/api/cron/trigger?job_id=999&secret={TEST_SECRET}");
    let (status, _) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_endpoint_reports_uptime_and_checks() {
    let server = healthy_target().await;
    let db = setup_db().await;
    let monitor = insert_monitor(&db, "Site", &server.uri(), 200, None).await;
    let context = app_context(db, Arc::new(RecordingSender::default()));
    context.runner.check_monitor(monitor.id).await.unwrap();
    context.runner.check_monitor(monitor.id).await.unwrap();
    let router = create_router(context);

    let uri = format!("/api/monitors/{}/status", monitor.id);
    let (status, _) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_SECRET}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    let body = json_body(&body);
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert_eq!(data["monitor_id"], json!(monitor.id));
    assert_eq!(data["current_status"], json!("up"));
    assert_eq!(data["uptime_24h"], json!(100.0));
    assert_eq!(data["recent_checks"].as_array().unwrap().len(), 2);
    assert_eq!(data["ongoing_incident"], Value::Null);
}

#[tokio::test]
async fn non_positive_ids_are_rejected() {
    let router = create_router(app_context(setup_db().await, Arc::new(RecordingSender::default())));

    let uri = format!("/api/monitors/trigger?monitor_id=0&secret={TEST_SECRET}");
    let (status, body) = send(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"]["code"], json!("VALIDATION_ERROR"));

    // 密钥错误优先于参数校验
    let (status, _) = send(&router, get("/api/cron/trigger?job_id=-1&secret=nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_or_malformed_ids_still_require_the_secret() {
    let router = create_router(app_context(setup_db().await, Arc::new(RecordingSender::default())));

    for uri in [
        "/api/cron/trigger",
        "/api/monitors/trigger",
        "/api/monitors/trigger?monitor_id=abc",
        "/api/cron/trigger?job_id=abc&secret=nope",
    ] {
        let (status, body) = send(&router, get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        let body = json_body(&body);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
    }

    // 密钥正确后才校验 ID
    for uri in [
        format!("/api/cron/trigger?secret={TEST_SECRET}"),
        format!("/api/cron/trigger?job_id=&secret={TEST_SECRET}"),
        format!("/api/monitors/trigger?monitor_id=abc&secret={TEST_SECRET}"),
    ] {
        let (status, body) = send(&router, get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json_body(&body)["error"]["code"], json!("VALIDATION_ERROR"));
    }
}
