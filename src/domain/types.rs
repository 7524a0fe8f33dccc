// ==========================================
// 保质期写损预测系统 - 领域类型定义
// ==========================================
// 红线: 写损触发日期的口径必须显式参数化,
//       两种模式的差异不允许被默认值掩盖
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 写损口径 (Governing Horizon)
// ==========================================
// 写损触发日期由哪个保质期字段决定:
// - StoreShelfLife: 门店下架口径 (详情模式的历史行为)
// - CustomerShelfLife: 顾客剩余保质期口径 (批量扫描的历史行为,
//   同时单独跟踪门店口径日期作为 ALD 预警信号)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoverningHorizon {
    StoreShelfLife,    // 门店下架口径
    CustomerShelfLife, // 顾客剩余保质期口径
}

impl fmt::Display for GoverningHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoverningHorizon::StoreShelfLife => write!(f, "STORE_SHELF_LIFE"),
            GoverningHorizon::CustomerShelfLife => write!(f, "CUSTOMER_SHELF_LIFE"),
        }
    }
}

impl GoverningHorizon {
    /// 从字符串解析写损口径（无法识别时回退到门店口径）
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CUSTOMER_SHELF_LIFE" => GoverningHorizon::CustomerShelfLife,
            _ => GoverningHorizon::StoreShelfLife,
        }
    }

    /// 转换为配置存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            GoverningHorizon::StoreShelfLife => "STORE_SHELF_LIFE",
            GoverningHorizon::CustomerShelfLife => "CUSTOMER_SHELF_LIFE",
        }
    }
}

// ==========================================
// 批次来源 (Batch Origin)
// ==========================================
// 用于初始构成展示与可解释性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchOrigin {
    Receipt,   // 历史收货匹配
    Unmatched, // 悲观重建的未匹配余量
    Scheduled, // 模拟期间注入的在途订单
}

impl fmt::Display for BatchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOrigin::Receipt => write!(f, "RECEIPT"),
            BatchOrigin::Unmatched => write!(f, "UNMATCHED"),
            BatchOrigin::Scheduled => write!(f, "SCHEDULED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governing_horizon_roundtrip() {
        assert_eq!(
            GoverningHorizon::from_str("CUSTOMER_SHELF_LIFE"),
            GoverningHorizon::CustomerShelfLife
        );
        assert_eq!(
            GoverningHorizon::from_str("customer_shelf_life"),
            GoverningHorizon::CustomerShelfLife
        );
        // 无法识别时回退到门店口径
        assert_eq!(
            GoverningHorizon::from_str("???"),
            GoverningHorizon::StoreShelfLife
        );
        assert_eq!(
            GoverningHorizon::CustomerShelfLife.to_db_str(),
            "CUSTOMER_SHELF_LIFE"
        );
    }

    #[test]
    fn test_batch_origin_display() {
        assert_eq!(BatchOrigin::Unmatched.to_string(), "UNMATCHED");
        assert_eq!(BatchOrigin::Scheduled.to_string(), "SCHEDULED");
    }
}
