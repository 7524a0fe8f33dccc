// ==========================================
// 保质期写损预测系统 - 历史/在途记录领域模型
// ==========================================
// 只读输入: 历史收货、在途订单、历史销售
// 仓储层负责字段归一化(坏日期→哨兵, 坏数量→0), 领域层不再校验
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ReceiptRecord - 历史收货记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub delivery_date: NaiveDate,    // 到货日期
    pub best_before_date: NaiveDate, // 批次最佳食用期
    pub quantity: f64,               // 到货数量
}

impl ReceiptRecord {
    /// 收货时的实际剩余保质期（天）
    pub fn actual_shelf_life_days(&self) -> i64 {
        (self.best_before_date - self.delivery_date).num_days()
    }

    /// 是否不合规收货: 收货时剩余保质期低于产品要求
    pub fn is_non_compliant(&self, shelf_life_at_receiving: i64) -> bool {
        self.actual_shelf_life_days() < shelf_life_at_receiving
    }
}

// ==========================================
// ScheduledReceipt - 在途订单 (未来到货)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledReceipt {
    pub delivery_date: NaiveDate, // 预计到货日期
    pub quantity: f64,            // 订单数量
}

// ==========================================
// SaleRecord - 历史销售记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_date: NaiveDate, // 销售日期
    pub quantity: f64,        // 销售数量
}

// ==========================================
// ManualDelivery - 人工补录的未来到货 (详情模式)
// ==========================================
// 详情模式请求可携带人工补录到货, 与在途订单合并后参与模拟
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualDelivery {
    pub delivery_date: NaiveDate, // 预计到货日期
    pub quantity: f64,            // 数量
}

impl From<ManualDelivery> for ScheduledReceipt {
    fn from(m: ManualDelivery) -> Self {
        ScheduledReceipt {
            delivery_date: m.delivery_date,
            quantity: m.quantity,
        }
    }
}

// ==========================================
// ShelfLifeOverrides - 保质期参数覆写 (详情模式)
// ==========================================
// None 字段表示沿用产品快照中的值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfLifeOverrides {
    pub shelf_life_at_receiving: Option<i64>,
    pub shelf_life_at_store: Option<i64>,
    pub customer_shelf_life: Option<i64>,
}
