use hostwatch::client::MetricsClient;
use hostwatch::dashboard::Dashboard;
use hostwatch::{HistoryBuffer, Host, HostId, PlatformKind, Poller};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn agent() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cpu": {"usage": 5, "cores": 2},
            "memory": {"used": 100, "total": 1000, "percent": 10},
            "disk": {"used": 1, "total": 10, "percent": 10},
            "network": {"download": 1.111, "upload": 2.225},
            "temperature": {"cpu": 45.678, "gpu": 50.1, "motherboard": 30}
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_dashboard_publishes_cycles_until_stopped() {
    let server = agent().await;

    let hosts = vec![
        Host::new("tower", server.uri(), PlatformKind::X86),
        Host::new("ghost", "http://127.0.0.1:1", PlatformKind::Arm),
    ];
    let client = MetricsClient::new(Duration::from_millis(500), "/system").unwrap();
    let dashboard = Dashboard::with_poller(
        hosts,
        Poller::new(client),
        HistoryBuffer::with_capacity(2),
        Duration::from_millis(50),
        Duration::from_millis(120),
    )
    .unwrap();

    let handle = dashboard.start();
    let mut updates = handle.subscribe();

    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            updates.changed().await.unwrap();
            if updates.borrow_and_update().cycle >= 4 {
                break;
            }
        }
    })
    .await
    .expect("dashboard did not complete four cycles");

    let snapshot = handle.latest();
    assert!(snapshot.cycle >= 4);
    assert!(snapshot.updated_at.is_some());
    assert_eq!(snapshot.statuses.len(), 2);
    assert_eq!(snapshot.online_count(), 1);
    assert!(snapshot.statuses[&HostId::from("tower")].is_online());
    assert_eq!(
        snapshot.statuses[&HostId::from("ghost")].error().unwrap().kind(),
        "unreachable"
    );

    let tower_history = &snapshot.history[&HostId::from("tower")];
    assert_eq!(tower_history.len(), 2);
    assert_eq!(tower_history[1].download_mbps, 1.11);
    assert_eq!(tower_history[1].upload_mbps, 2.23);
    assert!(snapshot.history[&HostId::from("ghost")].is_empty());

    tokio::time::timeout(Duration::from_secs(5), handle.stop())
        .await
        .expect("stop timed out")
        .unwrap();
}

#[tokio::test]
async fn test_prune_sweep_publishes_without_new_cycle() {
    let server = agent().await;
    let client = MetricsClient::new(Duration::from_millis(500), "/system").unwrap();
    let dashboard = Dashboard::with_poller(
        vec![Host::new("tower", server.uri(), PlatformKind::X86)],
        Poller::new(client),
        HistoryBuffer::new(),
        Duration::from_secs(3600),
        Duration::from_millis(50),
    )
    .unwrap();

    let handle = dashboard.start();
    let mut updates = handle.subscribe();

    let polled = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            updates.changed().await.unwrap();
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.cycle == 1 {
                break snapshot;
            }
        }
    })
    .await
    .expect("first poll cycle was not published");

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("prune sweep was not published")
        .unwrap();
    let swept = updates.borrow_and_update().clone();

    assert!(!Arc::ptr_eq(&polled, &swept));
    assert_eq!(swept.cycle, 1);
    assert!(swept.updated_at.is_some());
    assert!(swept.statuses[&HostId::from("tower")].is_online());
    assert_eq!(swept.history[&HostId::from("tower")].len(), 1);

    tokio::time::timeout(Duration::from_secs(5), handle.stop())
        .await
        .expect("stop timed out")
        .unwrap();
}
