// ==========================================
// 保质期写损预测系统 - 结果聚合引擎
// ==========================================
// 职责: 把推演轨迹折算成 KPI 结果对象
// 两种形态: 详情结果(带全量日志) / 批量扫描条目(无日志 + ALD/合规指标)
// 红线: 批量扫描只上报有可度量风险的产品
// ==========================================

use crate::domain::batch::BatchLedger;
use crate::domain::product::ProductSnapshot;
use crate::domain::records::ReceiptRecord;
use crate::domain::simulation::{BulkScanEntry, SimulationOutcome};
use crate::engine::simulator::SimulationTrace;

// ==========================================
// ResultAggregator - 结果聚合引擎
// ==========================================
pub struct ResultAggregator {
    // 无状态引擎, 不需要注入依赖
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 库存覆盖天数: 有效在手库存 / 平均日销量
    ///
    /// 销量为零时严格为 Infinity (详情模式仍返回结果)
    pub fn days_of_stock(&self, effective_on_hand: f64, avg_daily_sales: f64) -> f64 {
        if avg_daily_sales > 0.0 {
            effective_on_hand / avg_daily_sales
        } else {
            f64::INFINITY
        }
    }

    /// 组装详情模式结果
    ///
    /// # 参数
    /// - `snapshot`: 产品快照
    /// - `avg_daily_sales`: 平均日销量
    /// - `initial_ledger`: 重建出的初始台账 (用于构成展示)
    /// - `is_stock_data_complete`: 重建完整性标记
    /// - `trace`: 推演轨迹
    pub fn detailed_outcome(
        &self,
        snapshot: &ProductSnapshot,
        avg_daily_sales: f64,
        initial_ledger: &BatchLedger,
        is_stock_data_complete: bool,
        trace: SimulationTrace,
    ) -> SimulationOutcome {
        SimulationOutcome {
            warehouse_id: snapshot.warehouse_id.clone(),
            product_id: snapshot.product_id.clone(),
            total_write_off_qty: trace.total_write_off_qty,
            total_write_off_value: trace.total_write_off_qty * snapshot.price,
            days_of_stock: self.days_of_stock(snapshot.effective_on_hand(), avg_daily_sales),
            avg_daily_sales,
            first_write_off_date: trace.first_write_off_date,
            day_log: trace.day_log,
            initial_stock_composition: initial_ledger.iter().cloned().collect(),
            is_stock_data_complete,
        }
    }

    /// 组装批量扫描条目
    ///
    /// # 返回
    /// - Some(entry): 产品存在可度量风险
    /// - None: 写损总量与 ALD 峰值均为零, 不进入结果集
    ///
    /// # 说明
    /// 零销量产品在扫描层就被提前排除, 不会走到这里;
    /// 这里只负责"零风险省略"这一条省略规则
    pub fn bulk_entry(
        &self,
        snapshot: &ProductSnapshot,
        avg_daily_sales: f64,
        receipts: &[ReceiptRecord],
        is_stock_data_complete: bool,
        trace: &SimulationTrace,
    ) -> Option<BulkScanEntry> {
        if trace.total_write_off_qty <= 0.0 && trace.peak_early_warning_qty <= 0.0 {
            return None;
        }

        let non_compliant_receipts_count = receipts
            .iter()
            .filter(|r| r.is_non_compliant(snapshot.shelf_life_at_receiving))
            .count();

        Some(BulkScanEntry {
            warehouse_id: snapshot.warehouse_id.clone(),
            product_id: snapshot.product_id.clone(),
            total_write_off_qty: trace.total_write_off_qty,
            total_write_off_value: trace.total_write_off_qty * snapshot.price,
            days_of_stock: self.days_of_stock(snapshot.effective_on_hand(), avg_daily_sales),
            avg_daily_sales,
            first_write_off_date: trace.first_write_off_date,
            ald_value: trace.peak_early_warning_qty * snapshot.price,
            non_compliant_receipts_count,
            is_stock_data_complete,
        })
    }

    /// 扫描结果排序: 写损金额降序 → ALD 金额降序 → 产品标识升序
    pub fn sort_entries(&self, entries: &mut [BulkScanEntry]) {
        entries.sort_by(|a, b| {
            b.total_write_off_value
                .total_cmp(&a.total_write_off_value)
                .then_with(|| b.ald_value.total_cmp(&a.ald_value))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
    }
}

impl Default for ResultAggregator {
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
    use chrono::NaiveDate;

    fn snapshot(price: f64, stock: f64) -> ProductSnapshot {
        ProductSnapshot {
            warehouse_id: "W01".to_string(),
            product_id: "P001".to_string(),
            item_group_id: "G1".to_string(),
            status_id: "ACTIVE".to_string(),
            shelf_life_at_receiving: 7,
            shelf_life_at_store: 5,
            customer_shelf_life: 2,
            price,
            stock_on_hand: stock,
            unprocessed_delivery_qty: 0.0,
        }
    }

    fn trace(write_off_qty: f64, peak_warned: f64) -> SimulationTrace {
        SimulationTrace {
            day_log: Vec::new(),
            total_write_off_qty: write_off_qty,
            first_write_off_date: if write_off_qty > 0.0 {
                NaiveDate::from_ymd_opt(2026, 3, 5)
            } else {
                None
            },
            peak_early_warning_qty: peak_warned,
            final_stock: 0.0,
            days_simulated: 10,
        }
    }

    fn receipt(delivery: (i32, u32, u32), bbd: (i32, u32, u32)) -> ReceiptRecord {
        ReceiptRecord {
            delivery_date: NaiveDate::from_ymd_opt(delivery.0, delivery.1, delivery.2).unwrap(),
            best_before_date: NaiveDate::from_ymd_opt(bbd.0, bbd.1, bbd.2).unwrap(),
            quantity: 10.0,
        }
    }

    #[test]
    fn test_days_of_stock_infinity_at_zero_rate() {
        let agg = ResultAggregator::new();
        assert_eq!(agg.days_of_stock(100.0, 10.0), 10.0);
        assert!(agg.days_of_stock(100.0, 0.0).is_infinite());
    }

    #[test]
    fn test_detailed_outcome_values() {
        let agg = ResultAggregator::new();
        let snap = snapshot(2.5, 100.0);
        let outcome = agg.detailed_outcome(&snap, 10.0, &BatchLedger::new(), true, trace(8.0, 0.0));

        assert_eq!(outcome.total_write_off_qty, 8.0);
        assert_eq!(outcome.total_write_off_value, 20.0);
        assert_eq!(outcome.days_of_stock, 10.0);
        assert!(outcome.is_stock_data_complete);
    }

    #[test]
    fn test_bulk_entry_omitted_when_no_risk() {
        let agg = ResultAggregator::new();
        let snap = snapshot(2.5, 100.0);

        let entry = agg.bulk_entry(&snap, 10.0, &[], true, &trace(0.0, 0.0));
        assert!(entry.is_none());
    }

    #[test]
    fn test_bulk_entry_reported_on_ald_only_risk() {
        // 写损为零但预警峰值非零: 仍上报
        let agg = ResultAggregator::new();
        let snap = snapshot(3.0, 100.0);

        let entry = agg.bulk_entry(&snap, 10.0, &[], true, &trace(0.0, 12.0)).unwrap();
        assert_eq!(entry.ald_value, 36.0);
        assert_eq!(entry.total_write_off_value, 0.0);
    }

    #[test]
    fn test_non_compliant_receipts_counted() {
        let agg = ResultAggregator::new();
        let snap = snapshot(1.0, 100.0); // 要求收货剩余保质期 >= 7 天
        let receipts = vec![
            receipt((2026, 3, 1), (2026, 3, 5)),  // 4 天 → 不合规
            receipt((2026, 3, 1), (2026, 3, 10)), // 9 天 → 合规
            receipt((2026, 3, 1), (2026, 3, 7)),  // 6 天 → 不合规
        ];

        let entry = agg
            .bulk_entry(&snap, 10.0, &receipts, true, &trace(5.0, 0.0))
            .unwrap();
        assert_eq!(entry.non_compliant_receipts_count, 2);
    }

    #[test]
    fn test_sort_entries_ordering() {
        let agg = ResultAggregator::new();
        let snap = snapshot(1.0, 10.0);

        let mut entries = vec![
            BulkScanEntry {
                product_id: "B".to_string(),
                total_write_off_value: 10.0,
                ald_value: 1.0,
                ..agg.bulk_entry(&snap, 1.0, &[], true, &trace(1.0, 0.0)).unwrap()
            },
            BulkScanEntry {
                product_id: "A".to_string(),
                total_write_off_value: 10.0,
                ald_value: 1.0,
                ..agg.bulk_entry(&snap, 1.0, &[], true, &trace(1.0, 0.0)).unwrap()
            },
            BulkScanEntry {
                product_id: "C".to_string(),
                total_write_off_value: 10.0,
                ald_value: 5.0,
                ..agg.bulk_entry(&snap, 1.0, &[], true, &trace(1.0, 0.0)).unwrap()
            },
            BulkScanEntry {
                product_id: "D".to_string(),
                total_write_off_value: 99.0,
                ald_value: 0.0,
                ..agg.bulk_entry(&snap, 1.0, &[], true, &trace(1.0, 0.0)).unwrap()
            },
        ];

        agg.sort_entries(&mut entries);

        let ids: Vec<&str> = entries.iter().map(|e| e.product_id.as_str()).collect();
        // 金额降序 → ALD 降序 → 产品标识升序
        assert_eq!(ids, vec!["D", "C", "A", "B"]);
    }
}
