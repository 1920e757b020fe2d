use hostwatch::client::MetricsClient;
use hostwatch::models::sensor::TemperatureReadings;
use hostwatch::{HistoryBuffer, Host, HostError, HostId, HostStatus, PlatformKind, Poller};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn system_payload() -> Value {
    json!({
        "cpu": {"usagePercent": 23.456, "coreCount": 4, "temperatureC": 48.2},
        "memory": {"usedMB": 1536.777, "totalMB": 4096, "percent": 37.52},
        "disk": {"usedGB": 20.5, "totalGB": 64, "percent": 32.03},
        "network": {"downloadMBps": 2.345, "uploadMBps": 0.1234, "pingMs": 12},
        "temperature": {"cpu": 40.005, "rp1": 38, "ssd": null},
        "fan": {"cpu": 3000},
        "uptime": {"days": 1, "hours": 2, "minutes": 3},
        "processes": [{"name": "python3", "cpuPercent": 12.5, "memoryPercent": 3.25}]
    })
}

async fn agent(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn poller(timeout: Duration) -> Poller {
    Poller::new(MetricsClient::new(timeout, "/system").unwrap())
}

#[tokio::test]
async fn test_successful_poll_is_normalized() {
    let server = agent(ResponseTemplate::new(200).set_body_json(system_payload())).await;
    let hosts = vec![Host::new("pi", server.uri(), PlatformKind::Arm)];
    let mut history = HistoryBuffer::new();

    let statuses = poller(Duration::from_secs(5)).poll_once(&hosts, &mut history).await;

    let snapshot = statuses[&HostId::from("pi")].snapshot().expect("host should be online");
    assert_eq!(snapshot.cpu.usage_percent, 23.46);
    assert_eq!(snapshot.memory.used_mb, 1536.78);
    assert_eq!(snapshot.memory.total_mb, 4096.0);
    assert_eq!(
        snapshot.temperature,
        TemperatureReadings::Arm {
            cpu: Some(40.01),
            rp1: Some(38.0),
            ssd: None,
        }
    );

    let points = history.read(&HostId::from("pi"));
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].download_mbps, 2.35);
    assert_eq!(points[0].upload_mbps, 0.12);
}

#[tokio::test]
async fn test_bad_response_and_unreachable() {
    let server = agent(ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;
    let hosts = vec![
        Host::new("host1", server.uri(), PlatformKind::X86),
        Host::new("host2", "http://127.0.0.1:1", PlatformKind::Arm),
    ];
    let mut history = HistoryBuffer::new();

    let statuses = poller(Duration::from_secs(5)).poll_once(&hosts, &mut history).await;

    assert_eq!(statuses.len(), 2);
    let ids: Vec<&str> = statuses.keys().map(HostId::as_str).collect();
    assert_eq!(ids, vec!["host1", "host2"]);
    assert_eq!(
        statuses[&HostId::from("host1")],
        HostStatus::Offline(HostError::BadResponse(500))
    );
    assert_eq!(statuses[&HostId::from("host2")].error().unwrap().kind(), "unreachable");
    assert!(history.is_empty(&HostId::from("host1")));
}

#[tokio::test]
async fn test_duplicate_host_keeps_first_status() {
    let server = agent(ResponseTemplate::new(500)).await;
    let hosts = vec![
        Host::new("pi", server.uri(), PlatformKind::Arm),
        Host::new("pi", "http://127.0.0.1:1", PlatformKind::Arm),
        Host::new("tower", server.uri(), PlatformKind::X86),
    ];
    let mut history = HistoryBuffer::new();

    let statuses = poller(Duration::from_secs(5)).poll_once(&hosts, &mut history).await;

    let ids: Vec<&str> = statuses.keys().map(HostId::as_str).collect();
    assert_eq!(ids, vec!["pi", "tower"]);
    assert_eq!(
        statuses[&HostId::from("pi")],
        HostStatus::Offline(HostError::BadResponse(500))
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_timeout_does_not_delay_other_hosts() {
    let slow = agent(
        ResponseTemplate::new(200)
            .set_body_json(system_payload())
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let fast = agent(ResponseTemplate::new(200).set_body_json(system_payload())).await;
    let hosts = vec![
        Host::new("slow", slow.uri(), PlatformKind::X86),
        Host::new("fast", fast.uri(), PlatformKind::X86),
    ];
    let mut history = HistoryBuffer::new();

    let start = Instant::now();
    let statuses = poller(Duration::from_millis(500)).poll_once(&hosts, &mut history).await;
    let elapsed = start.elapsed();

    assert_eq!(
        statuses[&HostId::from("slow")],
        HostStatus::Offline(HostError::Timeout)
    );
    assert!(statuses[&HostId::from("fast")].is_online());
    assert!(elapsed < Duration::from_secs(2), "cycle took {:?}", elapsed);
    assert!(history.is_empty(&HostId::from("slow")));
    assert_eq!(history.len(&HostId::from("fast")), 1);
}

#[tokio::test]
async fn test_malformed_payloads() {
    let not_json = agent(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let mut missing_field = system_payload();
    missing_field["disk"].as_object_mut().unwrap().remove("percent");
    let incomplete = agent(ResponseTemplate::new(200).set_body_json(missing_field)).await;

    let hosts = vec![
        Host::new("html", not_json.uri(), PlatformKind::X86),
        Host::new("incomplete", incomplete.uri(), PlatformKind::X86),
    ];
    let mut history = HistoryBuffer::new();

    let statuses = poller(Duration::from_secs(5)).poll_once(&hosts, &mut history).await;

    for id in ["html", "incomplete"] {
        let err = statuses[&HostId::from(id)].error().expect("host should be offline");
        assert_eq!(err.kind(), "malformed-payload", "{}: {}", id, err);
    }
}

#[tokio::test]
async fn test_snapshot_without_network_skips_history() {
    let mut payload = system_payload();
    payload.as_object_mut().unwrap().remove("network");
    let server = agent(ResponseTemplate::new(200).set_body_json(payload)).await;
    let hosts = vec![Host::new("quiet", server.uri(), PlatformKind::X86)];
    let mut history = HistoryBuffer::new();

    let statuses = poller(Duration::from_secs(5)).poll_once(&hosts, &mut history).await;

    assert!(statuses[&HostId::from("quiet")].is_online());
    assert!(history.read(&HostId::from("quiet")).is_empty());
}

#[tokio::test]
async fn test_history_stays_bounded_across_cycles() {
    let server = agent(ResponseTemplate::new(200).set_body_json(system_payload())).await;
    let hosts = vec![Host::new("pi", server.uri(), PlatformKind::Arm)];
    let mut history = HistoryBuffer::with_capacity(3);
    let poller = poller(Duration::from_secs(5));

    for _ in 0..5 {
        poller.poll_once(&hosts, &mut history).await;
    }

    assert_eq!(history.len(&HostId::from("pi")), 3);
}
