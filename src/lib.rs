// ==========================================
// 保质期写损预测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + Tokio
// 系统定位: 决策支持系统 (预测临期库存写损风险)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与后台扫描
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BatchOrigin, GoverningHorizon};

// 领域实体
pub use domain::{
    Batch, BatchLedger, BulkScanEntry, ProductSnapshot, ReceiptRecord, SaleRecord,
    ScheduledReceipt, SimulationDay, SimulationOutcome,
};

// 引擎
pub use engine::{
    BatchReconstructor, DemandEstimator, ForwardSimulator, HorizonCalculator, ResultAggregator,
};

// API
pub use api::{BulkScanRequest, DetailedForecastRequest, ForecastApi, ScanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "保质期写损预测系统";

// 前瞻模拟硬上限（天）- 模拟循环永远在此窗口内终止
pub const MAX_HORIZON_DAYS: i64 = 365;

// ==========================================
// 预编译检查
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_max_horizon_bound() {
        assert_eq!(MAX_HORIZON_DAYS, 365);
    }
}
