// ==========================================
// 保质期写损预测系统 - 批次台账领域模型
// ==========================================
// 批次台账是一次模拟运行中独占持有的有序批次集合,
// 永远最早到期优先消耗, 从不落库。
// 红线: 最旧优先的弹出/插入必须是显式操作, 不允许
//       通过数组切片副作用实现
// ==========================================

use crate::domain::types::BatchOrigin;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 浮点数量的耗尽阈值
const QTY_EPSILON: f64 = 1e-9;

// ==========================================
// Batch - 单个批次
// ==========================================
// 由批次重建器(初始)或前瞻模拟器(在途到货)创建,
// 只因销售消耗被扣减, 因耗尽或写损被移除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub quantity: f64,                     // 剩余数量 (非负)
    pub best_before_date: NaiveDate,       // 最佳食用期
    pub write_off_trigger_date: NaiveDate, // 写损触发日期 (之后必须销毁)
    pub early_warning_date: NaiveDate,     // ALD 预警日期 (更早更严格)
    pub origin: BatchOrigin,               // 批次来源 (可解释性)
}

// ==========================================
// BatchLedger - FIFO 批次台账
// ==========================================
// 不变量: 所有批次数量之和 == 当前模拟库存
// 不变量: 消耗(销售或写损)永远先碰最早到期的未耗尽批次
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchLedger {
    batches: VecDeque<Batch>,
}

impl BatchLedger {
    /// 创建空台账
    pub fn new() -> Self {
        Self {
            batches: VecDeque::new(),
        }
    }

    /// 台账中批次数量之和 (== 当前模拟库存)
    pub fn total_quantity(&self) -> f64 {
        self.batches.iter().map(|b| b.quantity).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// 批次条数
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// 只读遍历 (最早到期在前)
    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter()
    }

    /// 追加到队尾 (调用方保证顺序, 用于重建阶段按到期升序装入)
    pub fn push_back(&mut self, batch: Batch) {
        self.batches.push_back(batch);
    }

    /// 插入到队首 (悲观重建的未匹配余量批次:
    /// 无论其名义日期如何, 消耗顺序上必须先于所有收货匹配批次)
    pub fn push_front(&mut self, batch: Batch) {
        self.batches.push_front(batch);
    }

    /// 按最佳食用期排序插入 (在途到货注入)
    ///
    /// 同日期的批次保持先入在前, 不打乱既有 FIFO 顺序
    pub fn insert_sorted(&mut self, batch: Batch) {
        let pos = self
            .batches
            .iter()
            .position(|b| b.best_before_date > batch.best_before_date)
            .unwrap_or(self.batches.len());
        self.batches.insert(pos, batch);
    }

    /// FIFO 消耗: 从最早到期批次开始扣减, 耗尽的批次移除
    ///
    /// # 返回
    /// 实际消耗数量 (<= requested, 受当前库存约束)
    pub fn consume(&mut self, requested: f64) -> f64 {
        let mut remaining = requested.max(0.0);
        let mut consumed = 0.0;

        while remaining > QTY_EPSILON {
            let Some(front) = self.batches.front_mut() else {
                break;
            };

            let take = front.quantity.min(remaining);
            front.quantity -= take;
            consumed += take;
            remaining -= take;

            if front.quantity <= QTY_EPSILON {
                self.batches.pop_front();
            }
        }

        consumed
    }

    /// 写损评估: 移除所有触发日期已过的批次, 返回移除总量
    ///
    /// 触发日期是"之后必须销毁"的日期, 判定为严格小于当日
    pub fn write_off_due(&mut self, current_date: NaiveDate) -> f64 {
        let mut written_off = 0.0;
        self.batches.retain(|b| {
            if b.write_off_trigger_date < current_date {
                written_off += b.quantity;
                false
            } else {
                true
            }
        });
        written_off
    }

    /// 当前持有的、ALD 预警日期已过的数量 (峰值跟踪用)
    pub fn quantity_past_early_warning(&self, current_date: NaiveDate) -> f64 {
        self.batches
            .iter()
            .filter(|b| b.early_warning_date < current_date)
            .map(|b| b.quantity)
            .sum()
    }
}
