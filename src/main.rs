// ==========================================
// 保质期写损预测系统 - 命令行入口
// ==========================================
// 技术栈: Rust + SQLite + Tokio
// 系统定位: 决策支持系统 (预测临期库存写损风险)
// ==========================================

use shelflife_forecast::api::{BulkScanRequest, DetailedForecastRequest};
use shelflife_forecast::app::{get_default_db_path, AppState, ScanMessage, ScanWorker};

fn print_usage() {
    println!("==================================================");
    println!("{} v{}", shelflife_forecast::APP_NAME, shelflife_forecast::VERSION);
    println!("==================================================");
    println!();
    println!("用法:");
    println!("  shelflife-forecast detailed <仓库编号> <产品编号>");
    println!("  shelflife-forecast scan [仓库编号,仓库编号,...]");
    println!();
    println!("数据库路径: 环境变量 SHELFLIFE_FORECAST_DB_PATH 可覆盖默认位置");
}

#[tokio::main]
async fn main() {
    // 初始化日志系统
    shelflife_forecast::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", shelflife_forecast::APP_NAME);
    tracing::info!("系统版本: {}", shelflife_forecast::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    match args[1].as_str() {
        // ==========================================
        // 单品详情预测
        // ==========================================
        "detailed" => {
            if args.len() < 4 {
                print_usage();
                std::process::exit(1);
            }

            let request = DetailedForecastRequest {
                warehouse_id: args[2].clone(),
                product_id: args[3].clone(),
                governing_horizon: None,
                shelf_life_overrides: None,
                manual_deliveries: Vec::new(),
            };

            match app_state.forecast_api.run_detailed(&request) {
                Ok(outcome) => {
                    let json = serde_json::to_string_pretty(&outcome)
                        .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
                    println!("{}", json);
                }
                Err(e) => {
                    eprintln!("详情预测失败: {}", e);
                    std::process::exit(1);
                }
            }
        }

        // ==========================================
        // 批量扫描
        // ==========================================
        "scan" => {
            let warehouse_ids: Vec<String> = if args.len() > 2 {
                args[2]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            } else {
                Vec::new()
            };

            let request = BulkScanRequest {
                warehouse_ids,
                item_group_ids: Vec::new(),
                status_ids: Vec::new(),
            };

            let worker = ScanWorker::new(app_state.scan_api.clone());
            let mut rx = worker.spawn(request);

            while let Some(message) = rx.recv().await {
                match message {
                    ScanMessage::Progress(progress) => {
                        tracing::info!(
                            "扫描进度: {}/{}",
                            progress.processed,
                            progress.total
                        );
                    }
                    ScanMessage::Finished(Ok(entries)) => {
                        let json = serde_json::to_string_pretty(&entries)
                            .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
                        println!("{}", json);
                        break;
                    }
                    ScanMessage::Finished(Err(e)) => {
                        eprintln!("批量扫描失败: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }

        _ => {
            print_usage();
            std::process::exit(1);
        }
    }
}
