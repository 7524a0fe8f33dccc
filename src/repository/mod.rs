// ==========================================
// 保质期写损预测系统 - 数据仓储层
// ==========================================
// 职责: 记录库的数据访问 (产品/历史收货/在途订单/历史销售)
// 红线: Repository 不含业务逻辑
// 红线: 坏字段在仓储层归一化, 一条坏记录不允许中断整次运行
// ==========================================

pub mod error;
pub mod order_repo;
pub mod product_repo;
pub mod receipt_repo;
pub mod sale_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::OpenOrderRepository;
pub use product_repo::ProductRepository;
pub use receipt_repo::ReceiptRepository;
pub use sale_repo::SaleRepository;
