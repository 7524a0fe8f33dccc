// ==========================================
// 保质期写损预测系统 - 模拟结果领域模型
// ==========================================
// 模拟结果只存在于一次运行的生命周期内, 从不落库
// 不变量: 每个模拟日 stock_end = stock_start + receipts - sales - write_offs
// ==========================================

use crate::domain::batch::Batch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SimulationDay - 单日动账记录 (详情模式)
// ==========================================
// 只有当日存在动账(销售/到货/写损任一非零)才会产生记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationDay {
    pub date: NaiveDate,      // 模拟日期
    pub stock_start: f64,     // 日初库存
    pub sales: f64,           // 当日销售消耗
    pub receipts: f64,        // 当日到货注入
    pub write_offs: f64,      // 当日写损数量
    pub stock_end: f64,       // 日末库存
    pub notes: Option<String>, // 备注 (如首次写损)
}

impl SimulationDay {
    /// 守恒校验: stock_end == stock_start + receipts - sales - write_offs
    pub fn conservation_holds(&self) -> bool {
        let expected = self.stock_start + self.receipts - self.sales - self.write_offs;
        (self.stock_end - expected).abs() < 1e-6
    }

    /// 当日是否有任何动账
    pub fn has_movement(&self) -> bool {
        self.sales > 0.0 || self.receipts > 0.0 || self.write_offs > 0.0
    }
}

// ==========================================
// SimulationOutcome - 详情模式结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub warehouse_id: String,
    pub product_id: String,

    // ===== 核心指标 =====
    pub total_write_off_qty: f64,   // 预测写损总量
    pub total_write_off_value: f64, // 预测写损金额 (数量 × 单价)
    pub days_of_stock: f64,         // 库存覆盖天数 (销量为零时为 Infinity)
    pub avg_daily_sales: f64,       // 平均日销量
    pub first_write_off_date: Option<NaiveDate>, // 首次写损日期

    // ===== 明细 =====
    pub day_log: Vec<SimulationDay>,          // 全量日志 (仅详情模式)
    pub initial_stock_composition: Vec<Batch>, // 重建出的初始批次构成

    // ===== 数据质量 =====
    pub is_stock_data_complete: bool, // 库存历史是否完整覆盖在手库存
}

// ==========================================
// BulkScanEntry - 批量扫描单品结果
// ==========================================
// 只有存在可度量风险的产品才会进入扫描结果集
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkScanEntry {
    pub warehouse_id: String,
    pub product_id: String,

    pub total_write_off_qty: f64,
    pub total_write_off_value: f64,
    pub days_of_stock: f64,
    pub avg_daily_sales: f64,
    pub first_write_off_date: Option<NaiveDate>,

    // ALD 预警: 单价 × 整个运行期间"预警日期已过的持有量"峰值
    pub ald_value: f64,

    // 不合规收货条数: 收货时剩余保质期低于产品要求
    pub non_compliant_receipts_count: usize,

    pub is_stock_data_complete: bool,
}

impl BulkScanEntry {
    /// 是否有可度量的风险 (写损量或 ALD 峰值任一非零)
    ///
    /// 比较的是数量而不是金额: 零单价但确有风险的产品也应上报
    pub fn has_measurable_risk(&self, peak_early_warning_qty: f64) -> bool {
        self.total_write_off_qty > 0.0 || peak_early_warning_qty > 0.0
    }
}

// ==========================================
// ScanProgress - 批量扫描进度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub processed: usize, // 已处理产品数 (含失败跳过)
    pub total: usize,     // 候选产品总数 (失败不影响分母)
}
