// ==========================================
// 保质期写损预测系统 - 批次重建引擎
// ==========================================
// 职责: 从不完整的历史收货记录重建当前在手库存的批次构成
// 算法: 悲观 FIFO 重建 —— 假设"最旧的收货仍留在当前库存中"
//       (保质期风险的最坏情形), 而不是假设剩下的是新货
// 输出: 合计严格等于有效在手库存的批次台账 + 完整性标记
// ==========================================

use crate::domain::batch::{Batch, BatchLedger};
use crate::domain::records::ReceiptRecord;
use crate::domain::types::{BatchOrigin, GoverningHorizon};
use crate::engine::horizon::HorizonCalculator;
use chrono::NaiveDate;

/// 浮点余量的耗尽阈值
const QTY_EPSILON: f64 = 1e-9;

// ==========================================
// Reconstruction - 重建结果
// ==========================================
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub ledger: BatchLedger,
    /// 历史收货是否完整覆盖了在手库存 (出现悲观余量批次时为 false)
    pub is_complete: bool,
}

// ==========================================
// BatchReconstructor - 批次重建引擎
// ==========================================
pub struct BatchReconstructor {
    horizon: HorizonCalculator,
}

impl BatchReconstructor {
    pub fn new() -> Self {
        Self {
            horizon: HorizonCalculator::new(),
        }
    }

    /// 重建初始批次台账
    ///
    /// # 参数
    /// - `effective_on_hand`: 有效在手库存 (账面 + 已到货未过账)
    /// - `receipts`: 全部历史收货记录 (无序)
    /// - `today`: 模拟起始日
    /// - `shelf_life_at_store` / `customer_shelf_life` / `governing`: 口径参数
    ///
    /// # 算法
    /// 1. 收货按到货日期升序排序 (最旧在前)
    /// 2. 自旧向新逐条生成 min(余量, 收货量) 的批次, 扣减余量
    /// 3. 收货耗尽仍有余量时, 合成恰好一个"悲观余量批次":
    ///    名义日期取今天 (已处于最早可能的风险点), 完整性标记置 false
    /// 4. 台账按最佳食用期升序排列; 悲观余量批次强制排在队首,
    ///    保证其消耗顺序先于所有收货匹配批次
    pub fn reconstruct(
        &self,
        effective_on_hand: f64,
        receipts: &[ReceiptRecord],
        today: NaiveDate,
        shelf_life_at_store: i64,
        customer_shelf_life: i64,
        governing: GoverningHorizon,
    ) -> Reconstruction {
        let mut ledger = BatchLedger::new();

        // 零库存: 空台账, 完整性为 true
        if effective_on_hand <= QTY_EPSILON {
            return Reconstruction {
                ledger,
                is_complete: true,
            };
        }

        // 1. 按到货日期升序 (最旧在前)
        let mut sorted: Vec<&ReceiptRecord> =
            receipts.iter().filter(|r| r.quantity > 0.0).collect();
        sorted.sort_by_key(|r| r.delivery_date);

        // 2. 悲观匹配: 最旧收货优先占用在手库存
        let mut remaining = effective_on_hand;
        let mut matched: Vec<Batch> = Vec::new();

        for receipt in sorted {
            if remaining <= QTY_EPSILON {
                break;
            }

            let qty = remaining.min(receipt.quantity);
            let horizons = self.horizon.compute(
                receipt.best_before_date,
                shelf_life_at_store,
                customer_shelf_life,
                governing,
            );

            matched.push(Batch {
                quantity: qty,
                best_before_date: receipt.best_before_date,
                write_off_trigger_date: horizons.write_off_trigger_date,
                early_warning_date: horizons.early_warning_date,
                origin: BatchOrigin::Receipt,
            });

            remaining -= qty;
        }

        // 消耗顺序按到期日, 不按到货日: 稳定排序保持同日期的先后
        matched.sort_by_key(|b| b.best_before_date);
        for batch in matched {
            ledger.push_back(batch);
        }

        // 3. 未匹配余量 → 单个悲观批次, 名义日期取今天
        let is_complete = remaining <= QTY_EPSILON;
        if !is_complete {
            tracing::debug!(
                "收货历史不足以覆盖在手库存, 合成悲观余量批次: qty={:.3}",
                remaining
            );

            let horizons =
                self.horizon
                    .compute(today, shelf_life_at_store, customer_shelf_life, governing);

            // 4. 强制排在队首: 无论名义日期如何, 先于一切收货匹配批次被消耗
            ledger.push_front(Batch {
                quantity: remaining,
                best_before_date: today,
                write_off_trigger_date: horizons.write_off_trigger_date,
                early_warning_date: horizons.early_warning_date,
                origin: BatchOrigin::Unmatched,
            });
        }

        Reconstruction {
            ledger,
            is_complete,
        }
    }
}

impl Default for BatchReconstructor {
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

    fn receipt(delivery: NaiveDate, bbd: NaiveDate, qty: f64) -> ReceiptRecord {
        ReceiptRecord {
            delivery_date: delivery,
            best_before_date: bbd,
            quantity: qty,
        }
    }

    fn reconstructor() -> BatchReconstructor {
        BatchReconstructor::new()
    }

    #[test]
    fn test_totals_match_effective_on_hand() {
        let receipts = vec![
            receipt(date(2026, 2, 1), date(2026, 3, 1), 40.0),
            receipt(date(2026, 2, 10), date(2026, 3, 10), 40.0),
        ];

        let result = reconstructor().reconstruct(
            60.0,
            &receipts,
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        assert!(result.is_complete);
        assert_eq!(result.ledger.len(), 2);
        assert!((result.ledger.total_quantity() - 60.0).abs() < 1e-9);

        // 最旧收货全量匹配, 较新收货只匹配到余量
        let quantities: Vec<f64> = result.ledger.iter().map(|b| b.quantity).collect();
        assert_eq!(quantities, vec![40.0, 20.0]);
    }

    #[test]
    fn test_oldest_receipts_are_assumed_still_on_hand() {
        // 两条收货共 100, 在手只有 30: 悲观地认为是最旧那批还压在库里
        let receipts = vec![
            receipt(date(2026, 2, 10), date(2026, 3, 10), 50.0),
            receipt(date(2026, 2, 1), date(2026, 3, 1), 50.0),
        ];

        let result = reconstructor().reconstruct(
            30.0,
            &receipts,
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        assert!(result.is_complete);
        assert_eq!(result.ledger.len(), 1);
        let only = result.ledger.iter().next().unwrap();
        assert_eq!(only.best_before_date, date(2026, 3, 1));
        assert_eq!(only.quantity, 30.0);
    }

    #[test]
    fn test_unmatched_remainder_becomes_single_pessimistic_batch() {
        let receipts = vec![receipt(date(2026, 2, 1), date(2026, 3, 1), 20.0)];

        let result = reconstructor().reconstruct(
            50.0,
            &receipts,
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        assert!(!result.is_complete);
        assert_eq!(result.ledger.len(), 2);
        assert!((result.ledger.total_quantity() - 50.0).abs() < 1e-9);

        // 悲观余量批次在队首, 名义日期为今天
        let first = result.ledger.iter().next().unwrap();
        assert_eq!(first.origin, BatchOrigin::Unmatched);
        assert_eq!(first.best_before_date, date(2026, 2, 20));
        assert_eq!(first.quantity, 30.0);
    }

    #[test]
    fn test_no_receipts_yields_one_pessimistic_batch() {
        let result = reconstructor().reconstruct(
            50.0,
            &[],
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        assert!(!result.is_complete);
        assert_eq!(result.ledger.len(), 1);
        let only = result.ledger.iter().next().unwrap();
        assert_eq!(only.origin, BatchOrigin::Unmatched);
        assert_eq!(only.quantity, 50.0);
    }

    #[test]
    fn test_zero_stock_yields_empty_complete_ledger() {
        let receipts = vec![receipt(date(2026, 2, 1), date(2026, 3, 1), 20.0)];

        let result = reconstructor().reconstruct(
            0.0,
            &receipts,
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        assert!(result.is_complete);
        assert!(result.ledger.is_empty());
    }

    #[test]
    fn test_pessimistic_batch_precedes_past_dated_receipts() {
        // 收货批次的到期日早于今天: 悲观余量批次仍必须排在它前面
        let receipts = vec![receipt(date(2026, 1, 1), date(2026, 2, 1), 10.0)];

        let result = reconstructor().reconstruct(
            25.0,
            &receipts,
            date(2026, 2, 20),
            5,
            2,
            GoverningHorizon::StoreShelfLife,
        );

        let first = result.ledger.iter().next().unwrap();
        assert_eq!(first.origin, BatchOrigin::Unmatched);
    }
}
