//! # 定时任务执行集成测试

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeDelta, Timelike, Utc};
use common::{RecordingSender, insert_cron_job, runner, setup_db};
use entity::{cron_executions, cron_jobs, incidents};
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn executions_for(db: &sea_orm::DatabaseConnection, job_id: i32) -> Vec<cron_executions::Model> {
    cron_executions::Entity::find()
        .filter(cron_executions::Column::JobId.eq(job_id))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn runs_only_due_active_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;
    let url = format!("{}/job", server.uri());

    let db = setup_db().await;
    let now = Utc::now().naive_utc();
    let never_scheduled = insert_cron_job(&db, "never", &url, "*/5 * * * *", None, true).await;
    let overdue = insert_cron_job(
        &db,
        "overdue",
        &url,
        "0 * * * *",
        Some(now - TimeDelta::minutes(10)),
        true,
    )
    .await;
    let future = insert_cron_job(
        &db,
        "future",
        &url,
        "0 * * * *",
        Some(now + TimeDelta::hours(1)),
        true,
    )
    .await;
    let inactive = insert_cron_job(&db, "inactive", &url, "0 * * * *", None, false).await;

    let runner = runner(db, Arc::new(RecordingSender::default()));
    let summary = runner.run_due_jobs(now).await.unwrap();

    assert_eq!(summary.executed, 2);
    assert_eq!(summary.succeeded, 2);
    let mut ran: Vec<i32> = summary.results.iter().map(|r| r.target_id).collect();
    ran.sort_unstable();
    assert_eq!(ran, vec![never_scheduled.id, overdue.id]);

    let db = runner.db();
    assert!(executions_for(db, future.id).await.is_empty());
    assert!(executions_for(db, inactive.id).await.is_empty());

    let executions = executions_for(db, never_scheduled.id).await;
    assert_eq!(executions.len(), 1);
    let execution = &executions[0];
    assert_eq!(execution.status, "success");
    assert_eq!(execution.response_status, Some(200));
    assert_eq!(execution.response_body.as_deref(), Some("done"));
    assert!(execution.completed_at.is_some());
    assert!(execution.duration_ms.is_some());
    assert_eq!(execution.error_message, None);

    let job = cron_jobs::Entity::find_by_id(never_scheduled.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.current_status, "up");
    assert_eq!(job.last_execution_status.as_deref(), Some("success"));
    assert!(job.last_run_at.is_some());
    let next = job.next_run_at.unwrap();
    assert!(next > now);
    assert_eq!(next.minute() % 5, 0);
    assert_eq!(next.second(), 0);
}

#[tokio::test]
async fn failing_job_opens_cron_incident() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let job = insert_cron_job(&db, "nightly export", &server.uri(), "0 3 * * *", None, true).await;
    let sender = Arc::new(RecordingSender::default());
    let runner = runner(db, Arc::clone(&sender));

    let result = runner.execute_job(job.id).await.unwrap();
    assert_eq!(result.status, "failed");

    let db = runner.db();
    let executions = executions_for(db, job.id).await;
    assert_eq!(executions[0].status, "failed");
    assert_eq!(executions[0].response_status, Some(503));
    assert_eq!(executions[0].response_body.as_deref(), Some("maintenance"));

    let stored = cron_jobs::Entity::find_by_id(job.id).one(db).await.unwrap().unwrap();
    assert_eq!(stored.current_status, "down");
    assert_eq!(stored.last_execution_status.as_deref(), Some("failed"));

    let open = incidents::Entity::find()
        .filter(incidents::Column::TargetKind.eq("cron_job"))
        .filter(incidents::Column::TargetId.eq(job.id))
        .all(db)
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].status, "ongoing");
    assert_eq!(open[0].cause, "status_code");
    assert_eq!(sender.messages().len(), 1);
}

#[tokio::test]
async fn slow_job_times_out_within_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let job = insert_cron_job(&db, "slow", &server.uri(), "* * * * *", None, true).await;
    let mut active: cron_jobs::ActiveModel = job.clone().into();
    active.timeout_seconds = sea_orm::Set(1);
    sea_orm::ActiveModelTrait::update(active, &db).await.unwrap();

    let runner = runner(db, Arc::new(RecordingSender::default()));
    let started = Instant::now();
    let result = runner.execute_job(job.id).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(2500));
    assert_eq!(result.status, "timeout");

    let executions = executions_for(runner.db(), job.id).await;
    assert_eq!(executions[0].status, "timeout");
    assert_eq!(executions[0].response_status, None);

    let open = incidents::Entity::find()
        .filter(incidents::Column::TargetId.eq(job.id))
        .one(runner.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(open.cause, "timeout");
}

#[tokio::test]
async fn invalid_expression_still_reschedules() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let job = insert_cron_job(&db, "broken", &server.uri(), "not a cron", None, true).await;
    let runner = runner(db, Arc::new(RecordingSender::default()));

    let before = Utc::now().naive_utc();
    runner.execute_job(job.id).await.unwrap();

    let stored = cron_jobs::Entity::find_by_id(job.id)
        .one(runner.db())
        .await
        .unwrap()
        .unwrap();
    let next = stored.next_run_at.unwrap();
    assert!(next >= before + TimeDelta::seconds(59));
    assert!(next <= Utc::now().naive_utc() + TimeDelta::minutes(1));
}

#[tokio::test]
async fn failed_completion_does_not_leave_execution_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let job = insert_cron_job(&db, "report", &server.uri(), "0 * * * *", None, true).await;
    // 带响应体的完整补全写入被拒绝，只改状态的收尾写入不受影响
    db.execute_unprepared(
        "CREATE TRIGGER reject_completion BEFORE UPDATE OF response_body ON cron_executions \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .await
    .unwrap();

    let runner = runner(db, Arc::new(RecordingSender::default()));
    assert!(runner.execute_job(job.id).await.is_err());

    let db = runner.db();
    let executions = executions_for(db, job.id).await;
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].status, "failed");
    assert!(executions[0].completed_at.is_some());
    assert_eq!(
        executions[0].error_message.as_deref(),
        Some("Failed to record execution result")
    );

    // 任务本身未改动，下次调用仍然到期
    let stored = cron_jobs::Entity::find_by_id(job.id).one(db).await.unwrap().unwrap();
    assert_eq!(stored.last_run_at, None);
    assert_eq!(stored.next_run_at, None);
    assert_eq!(stored.last_execution_status, None);
}
