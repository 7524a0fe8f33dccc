// ==========================================
// 保质期写损预测系统 - 到期口径引擎
// ==========================================
// 职责: 由最佳食用期与保质期参数推导每批次的触发日期
// 输入: 最佳食用期 + 三个保质期天数 + 显式写损口径
// 输出: 写损触发日期 + ALD 预警日期
// 红线: 纯日期运算, 无副作用; 口径必须显式传入, 不允许硬编码
// ==========================================

use crate::domain::types::GoverningHorizon;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// BatchHorizons - 单批次的两个阈值日期
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHorizons {
    /// 写损触发日期: 此日之后批次剩余数量必须销毁
    pub write_off_trigger_date: NaiveDate,
    /// ALD 预警日期: 更早更严格的风险标记日期 (门店下架口径)
    pub early_warning_date: NaiveDate,
}

// ==========================================
// HorizonCalculator - 到期口径引擎
// ==========================================
pub struct HorizonCalculator {
    // 无状态引擎, 不需要注入依赖
}

impl HorizonCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算单批次的触发日期
    ///
    /// # 参数
    /// - `best_before_date`: 批次最佳食用期
    /// - `shelf_life_at_store`: 门店下架提前量 (天)
    /// - `customer_shelf_life`: 顾客要求的最低剩余保质期 (天)
    /// - `governing`: 写损口径 (决定触发日期绑定哪个字段)
    ///
    /// # 规则
    /// - 写损触发日期 = 最佳食用期 - 口径对应的天数
    /// - ALD 预警日期 = 最佳食用期 - 门店下架提前量 (恒按门店口径)
    /// - 负的保质期天数按 0 处理
    pub fn compute(
        &self,
        best_before_date: NaiveDate,
        shelf_life_at_store: i64,
        customer_shelf_life: i64,
        governing: GoverningHorizon,
    ) -> BatchHorizons {
        let governing_days = match governing {
            GoverningHorizon::StoreShelfLife => shelf_life_at_store,
            GoverningHorizon::CustomerShelfLife => customer_shelf_life,
        };

        BatchHorizons {
            write_off_trigger_date: best_before_date - Duration::days(governing_days.max(0)),
            early_warning_date: best_before_date - Duration::days(shelf_life_at_store.max(0)),
        }
    }
}

impl Default for HorizonCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_store_governing() {
        let calc = HorizonCalculator::new();
        let horizons = calc.compute(date(2026, 3, 20), 5, 2, GoverningHorizon::StoreShelfLife);

        assert_eq!(horizons.write_off_trigger_date, date(2026, 3, 15));
        assert_eq!(horizons.early_warning_date, date(2026, 3, 15));
    }

    #[test]
    fn test_customer_governing_tracks_store_as_warning() {
        let calc = HorizonCalculator::new();
        let horizons = calc.compute(date(2026, 3, 20), 5, 2, GoverningHorizon::CustomerShelfLife);

        // 触发绑定顾客口径, 预警仍按门店口径 (更早更严格)
        assert_eq!(horizons.write_off_trigger_date, date(2026, 3, 18));
        assert_eq!(horizons.early_warning_date, date(2026, 3, 15));
        assert!(horizons.early_warning_date < horizons.write_off_trigger_date);
    }

    #[test]
    fn test_negative_shelf_life_clamped_to_zero() {
        let calc = HorizonCalculator::new();
        let horizons = calc.compute(date(2026, 3, 20), -3, -1, GoverningHorizon::StoreShelfLife);

        assert_eq!(horizons.write_off_trigger_date, date(2026, 3, 20));
        assert_eq!(horizons.early_warning_date, date(2026, 3, 20));
    }
}
