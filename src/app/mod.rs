// ==========================================
// 保质期写损预测系统 - 应用层
// ==========================================
// 职责: 状态装配、后台扫描执行、宿主通信
// ==========================================

pub mod state;
pub mod worker;

pub use state::{get_default_db_path, AppState};
pub use worker::{ScanMessage, ScanWorker};
