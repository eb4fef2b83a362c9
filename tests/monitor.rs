//! Monitor loop end to end: config in, checks and alerts out.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use url_sentry::checker::{HttpChecker, USER_AGENT};
use url_sentry::config::loader::parse_config;
use url_sentry::lifecycle::{startup, Shutdown};
use url_sentry::target::Transition;

mod common;
use common::{MockResponse, RecordingDispatcher, ScriptedChecker, StallingChecker};

fn soon() -> chrono::DateTime<Utc> {
    Utc::now() + TimeDelta::seconds(1)
}

#[tokio::test]
async fn test_run_once_alerts_on_flips_only() {
    let status = Arc::new(AtomicU16::new(200));
    let status_clone = status.clone();
    let addr = common::start_programmable_backend(move |_| {
        let status = status_clone.clone();
        async move { MockResponse::status(status.load(Ordering::SeqCst)) }
    })
    .await;

    let config = parse_config(&format!(
        r#"
        [defaults]
        interval = ""
        return_codes = [200]
        alert_email = ["ops@example.com"]

        [[targets]]
        name = "mock"
        url = "http://{addr}/health"
        "#
    ))
    .unwrap();

    let checker = HttpChecker::new(USER_AGENT, Duration::from_secs(5)).unwrap();
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut monitor =
        startup::build_monitor_with(&config, Arc::new(checker), dispatcher.clone()).unwrap();

    let reports = monitor.run_once_at(soon()).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, 200);
    assert!(reports[0].transition.is_none());

    status.store(500, Ordering::SeqCst);
    let reports = monitor.run_once_at(soon()).await;
    assert!(matches!(reports[0].transition, Some(Transition::Failed)));
    assert!(reports[0].alert_delivered);

    let reports = monitor.run_once_at(soon()).await;
    assert_eq!(reports[0].status, 500);
    assert!(reports[0].transition.is_none());

    status.store(200, Ordering::SeqCst);
    let reports = monitor.run_once_at(soon()).await;
    assert!(matches!(reports[0].transition, Some(Transition::Recovered)));

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].subject.contains("offline"));
    assert!(sent[0].body.contains("StatusCode: 500"));
    assert!(sent[1].subject.contains("online"));
    assert_eq!(sent[1].to, vec!["ops@example.com".to_string()]);
}

#[tokio::test]
async fn test_run_once_skips_targets_not_due() {
    let config = parse_config(
        r#"
        [[targets]]
        name = "hourly"
        url = "https://example.com"
        interval = "1h"
        "#,
    )
    .unwrap();

    let checker = Arc::new(ScriptedChecker::new(&[200]));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut monitor = startup::build_monitor_with(&config, checker.clone(), dispatcher).unwrap();

    assert_eq!(monitor.run_once_at(soon()).await.len(), 1);
    assert_eq!(monitor.run_once_at(soon()).await.len(), 0);
    assert_eq!(checker.calls(), 1);
}

#[tokio::test]
async fn test_no_alerts_suppresses_dispatch() {
    let config = parse_config(
        r#"
        no_alerts = true

        [[targets]]
        name = "down"
        url = "https://example.com"
        interval = ""
        return_codes = [200]
        alert_email = "ops@example.com"
        "#,
    )
    .unwrap();

    let checker = Arc::new(ScriptedChecker::new(&[503]));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut monitor =
        startup::build_monitor_with(&config, checker, dispatcher.clone()).unwrap();

    let reports = monitor.run_once_at(soon()).await;
    assert!(matches!(reports[0].transition, Some(Transition::Failed)));
    assert!(reports[0].alert.is_some());
    assert!(!reports[0].alert_delivered);
    assert!(dispatcher.sent().is_empty());
}

#[tokio::test]
async fn test_continuous_run_alerts_once_and_stops_on_shutdown() {
    let config = parse_config(
        r#"
        [[targets]]
        name = "flaky"
        url = "https://example.com"
        interval = ""
        return_codes = [200]
        alert_email = "ops@example.com"
        "#,
    )
    .unwrap();

    let checker = Arc::new(ScriptedChecker::new(&[500]));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let monitor =
        startup::build_monitor_with(&config, checker.clone(), dispatcher.clone()).unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();

    assert!(checker.calls() >= 2, "calls = {}", checker.calls());
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn test_slow_check_coalesces_signals() {
    let config = parse_config(
        r#"
        [[targets]]
        name = "slow"
        url = "https://example.com"
        interval = ""
        "#,
    )
    .unwrap();

    let checker = Arc::new(ScriptedChecker::new(&[200]).with_delay(Duration::from_secs(4)));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let monitor = startup::build_monitor_with(&config, checker.clone(), dispatcher).unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    // One check in flight; later ticks queue at most one more.
    assert_eq!(checker.calls(), 1);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(15), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_stalled_target_does_not_delay_others() {
    let config = parse_config(
        r#"
        [defaults]
        interval = ""
        return_codes = [200]

        [[targets]]
        name = "stalled"
        url = "https://stalled.example.com/"

        [[targets]]
        name = "fast"
        url = "https://fast.example.com/"
        "#,
    )
    .unwrap();

    let checker = Arc::new(StallingChecker::new(
        "https://stalled.example.com/",
        Duration::from_secs(60),
    ));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let monitor = startup::build_monitor_with(&config, checker.clone(), dispatcher).unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(checker.calls_for("https://stalled.example.com/"), 1);
    let fast = checker.calls_for("https://fast.example.com/");
    assert!(fast >= 3, "fast target checked {fast} times");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
}
