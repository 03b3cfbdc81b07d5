use chrono::{Duration, TimeZone, Utc};
use condo_tv::domain::model::{ContentStatus, TvStatus};
use condo_tv::{CondoTvError, ContentMonitor, InMemoryStore, StoreSnapshot};

fn store() -> InMemoryStore {
    let snapshot: StoreSnapshot = serde_json::from_value(serde_json::json!({
        "condominiums": [
            {"id": 1, "name": "Residencial Solar", "manager_id": 1}
        ],
        "tvs": [
            {
                "id": 1, "name": "Hall", "condominium_id": 1, "connection_code": "11111",
                "status": "online", "last_ping": "2025-10-31T11:50:00Z"
            },
            {
                "id": 2, "name": "Academia", "condominium_id": 1, "connection_code": "22222",
                "status": "online", "last_ping": "2025-10-31T11:58:00Z"
            },
            {
                "id": 3, "name": "Piscina", "condominium_id": 1, "connection_code": "33333",
                "status": "online"
            },
            {
                "id": 4, "name": "Garagem", "condominium_id": 1, "connection_code": "44444",
                "status": "offline", "last_ping": "2025-10-30T08:00:00Z"
            }
        ],
        "notices": [
            {"id": 1, "name": "Assembleia", "condominium_ids": "1", "status": "Ativo",
             "expires_at": "2025-10-31T10:00:00Z"},
            {"id": 2, "name": "Mudança", "condominium_ids": "1", "status": "Ativo",
             "expires_at": "2025-11-30T10:00:00Z"},
            {"id": 3, "name": "Sem prazo", "condominium_ids": "1", "status": "Ativo"}
        ],
        "ads": [
            {"id": 1, "name": "Padaria", "condominium_ids": "1", "status": "Ativo",
             "expires_at": "2025-10-31T12:00:00Z"},
            {"id": 2, "name": "Antigo", "condominium_ids": "1", "status": "Inativo",
             "expires_at": "2025-01-01T00:00:00Z"}
        ]
    }))
    .unwrap();
    InMemoryStore::new(snapshot)
}

fn noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 31, 12, 0, 0).unwrap()
}

fn status_of(snapshot: &StoreSnapshot, id: i64) -> TvStatus {
    snapshot.tvs.iter().find(|tv| tv.id == id).unwrap().status
}

#[tokio::test]
async fn test_offline_check_only_touches_stale_online_tvs() {
    let monitor = ContentMonitor::new(store());

    let changed = monitor.check_offline_tvs(noon()).await.unwrap();
    assert_eq!(changed, 1);

    let snapshot = monitor.store().snapshot().await;
    assert_eq!(status_of(&snapshot, 1), TvStatus::Offline);
    assert_eq!(status_of(&snapshot, 2), TvStatus::Online);
    // never pinged, so there is nothing to measure against
    assert_eq!(status_of(&snapshot, 3), TvStatus::Online);
    assert_eq!(status_of(&snapshot, 4), TvStatus::Offline);

    // last ping is kept so the dashboard can show when the TV was last seen
    let hall = snapshot.tvs.iter().find(|tv| tv.id == 1).unwrap();
    assert_eq!(hall.last_ping, Some(Utc.with_ymd_and_hms(2025, 10, 31, 11, 50, 0).unwrap()));
}

#[tokio::test]
async fn test_offline_window_is_configurable() {
    let monitor = ContentMonitor::new(store()).with_offline_after(Duration::minutes(1));

    let changed = monitor.check_offline_tvs(noon()).await.unwrap();
    assert_eq!(changed, 2);
}

#[tokio::test]
async fn test_heartbeat_brings_tv_back_online() {
    let monitor = ContentMonitor::new(store());
    let now = noon();

    let tv = monitor.record_heartbeat("44444", now).await.unwrap();
    assert_eq!(tv.status, TvStatus::Online);
    assert_eq!(tv.last_ping, Some(now));

    let snapshot = monitor.store().snapshot().await;
    assert_eq!(status_of(&snapshot, 4), TvStatus::Online);

    // a fresh heartbeat survives the next offline sweep
    monitor.check_offline_tvs(now + Duration::minutes(2)).await.unwrap();
    let snapshot = monitor.store().snapshot().await;
    assert_eq!(status_of(&snapshot, 4), TvStatus::Online);
}

#[tokio::test]
async fn test_heartbeat_for_unknown_code() {
    let monitor = ContentMonitor::new(store());
    let err = monitor.record_heartbeat("00000", noon()).await.unwrap_err();
    assert!(matches!(err, CondoTvError::NotFound { .. }));
}

#[tokio::test]
async fn test_expired_content_is_deactivated() {
    let monitor = ContentMonitor::new(store());

    let report = monitor.check_expired_content(noon()).await.unwrap();
    assert_eq!(report.notices_deactivated, 1);
    // expiring exactly now counts as expired
    assert_eq!(report.ads_deactivated, 1);
    assert_eq!(report.total(), 2);

    let snapshot = monitor.store().snapshot().await;
    let statuses: Vec<ContentStatus> = snapshot.notices.iter().map(|n| n.status).collect();
    assert_eq!(
        statuses,
        vec![ContentStatus::Inactive, ContentStatus::Active, ContentStatus::Active]
    );

    let again = monitor.check_expired_content(noon()).await.unwrap();
    assert_eq!(again.total(), 0);
}
