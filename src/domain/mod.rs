// ==========================================
// 保质期写损预测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod batch;
pub mod dates;
pub mod product;
pub mod records;
pub mod simulation;
pub mod types;

// 重导出核心类型
pub use batch::{Batch, BatchLedger};
pub use product::ProductSnapshot;
pub use records::{ManualDelivery, ReceiptRecord, SaleRecord, ScheduledReceipt, ShelfLifeOverrides};
pub use simulation::{BulkScanEntry, ScanProgress, SimulationDay, SimulationOutcome};
pub use types::{BatchOrigin, GoverningHorizon};
