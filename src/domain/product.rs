// ==========================================
// 保质期写损预测系统 - 产品快照领域模型
// ==========================================
// 用途: 单次模拟运行期间不可变的产品输入快照
// 红线: 每次运行只取一次快照, 运行期间不重新读取
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductSnapshot - 产品快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub warehouse_id: String, // 仓库/门店标识
    pub product_id: String,   // 产品标识

    // ===== 分组与状态 (批量扫描筛选用) =====
    pub item_group_id: String, // 商品组
    pub status_id: String,     // 产品状态

    // ===== 保质期参数 (天数) =====
    pub shelf_life_at_receiving: i64, // 收货时要求的最低剩余保质期
    pub shelf_life_at_store: i64,     // 门店下架提前量
    pub customer_shelf_life: i64,     // 顾客要求的最低剩余保质期

    // ===== 库存与价格 =====
    pub price: f64,                    // 单价
    pub stock_on_hand: f64,            // 账面库存
    pub unprocessed_delivery_qty: f64, // 已到货未过账数量
}

impl ProductSnapshot {
    /// 有效在手库存 = 账面库存 + 已到货未过账数量
    pub fn effective_on_hand(&self) -> f64 {
        self.stock_on_hand + self.unprocessed_delivery_qty
    }
}
