// ==========================================
// 保质期写损预测系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供应用层/宿主调用
// 边界: 进程内请求/响应, 无网络协议
// ==========================================

pub mod error;
pub mod forecast_api;
pub mod scan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use forecast_api::{DetailedForecastRequest, ForecastApi};
pub use scan_api::{BulkScanRequest, ScanApi};
