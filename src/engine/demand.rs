// ==========================================
// 保质期写损预测系统 - 需求估算引擎
// ==========================================
// 职责: 从历史销售记录计算平坦的平均日销量
// 规则: avg = 总销量 / 有销售的不同日期数
//       无销售的自然日不计入分母 (间歇性销售的商品不被稀释)
// 红线: 不做统计/ML 预测, 只取历史平均
// ==========================================

use crate::domain::records::SaleRecord;
use std::collections::BTreeSet;

// ==========================================
// DemandEstimator - 需求估算引擎
// ==========================================
pub struct DemandEstimator {
    // 无状态引擎, 不需要注入依赖
}

impl DemandEstimator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算平均日销量
    ///
    /// # 参数
    /// - `sales`: 该产品的全部历史销售记录 (无序)
    ///
    /// # 返回
    /// - 平均日销量; 没有任何有效销售记录时严格为 0.0
    ///
    /// # 说明
    /// 数量被归一为零的坏记录不计入分子也不计入分母
    pub fn estimate(&self, sales: &[SaleRecord]) -> f64 {
        let mut total_qty = 0.0;
        let mut active_dates = BTreeSet::new();

        for sale in sales {
            if sale.quantity > 0.0 {
                total_qty += sale.quantity;
                active_dates.insert(sale.sale_date);
            }
        }

        if active_dates.is_empty() {
            return 0.0;
        }

        total_qty / active_dates.len() as f64
    }
}

impl Default for DemandEstimator {
    fn default() -> Self {
        Self::new()
    }
}
