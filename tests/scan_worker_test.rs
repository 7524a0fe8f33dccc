// ==========================================
// 后台扫描执行器集成测试
// ==========================================
// 职责: 验证后台扫描的消息序列 (若干 Progress 后恰好一条 Finished)
// ==========================================


use chrono::NaiveDate;
use shelflife_forecast::api::BulkScanRequest;
use shelflife_forecast::app::{AppState, ScanMessage, ScanWorker};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// 测试1: 完整消息序列
// ==========================================
#[tokio::test]
async fn test_worker_emits_progress_then_finished() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();

    // 单个过期产品: 扫描完成时 (processed == total) 必然发布一次进度
    test_helpers::seed_product(&conn, "W01", "P001", 15, 5, 3, 2.0, 20.0).unwrap();
    test_helpers::seed_receipt(&conn, "W01", "P001", "2026-05-10", "2026-05-25", 20.0).unwrap();
    test_helpers::seed_daily_sales(&conn, "W01", "P001", date(2026, 5, 25), 2, 1.0).unwrap();
    drop(conn);

    let state = AppState::new(db_path).unwrap();
    let worker = ScanWorker::new(state.scan_api.clone());

    let mut rx = worker.spawn_at(BulkScanRequest::default(), date(2026, 6, 1));

    let mut progress_seen = Vec::new();
    let mut finished = None;

    while let Some(message) = rx.recv().await {
        match message {
            ScanMessage::Progress(p) => progress_seen.push(p),
            ScanMessage::Finished(result) => {
                finished = Some(result);
                break;
            }
        }
    }

    assert_eq!(progress_seen.len(), 1);
    assert_eq!(progress_seen[0].processed, 1);
    assert_eq!(progress_seen[0].total, 1);

    let entries = finished.expect("缺少 Finished 消息").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product_id, "P001");
}

// ==========================================
// 测试2: 空候选集直接收到 Finished
// ==========================================
#[tokio::test]
async fn test_worker_empty_candidates_finishes_without_progress() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();

    let state = AppState::new(db_path).unwrap();
    let worker = ScanWorker::new(state.scan_api.clone());

    let mut rx = worker.spawn_at(BulkScanRequest::default(), date(2026, 6, 1));

    let first = rx.recv().await.expect("通道提前关闭");
    match first {
        ScanMessage::Finished(result) => {
            assert!(result.unwrap().is_empty());
        }
        ScanMessage::Progress(p) => panic!("空候选集不应有进度消息: {:?}", p),
    }
}
