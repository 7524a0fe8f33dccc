// ==========================================
// 保质期写损预测系统 - 前瞻模拟引擎
// ==========================================
// 职责: 逐日步进的库存推演
// 输入: 初始批次台账 + 平均日销量 + 在途订单 + 口径参数
// 每日顺序: 1.到货注入 → 2.销售消耗(FIFO) → 3.写损评估 → 4.记账
// 红线: 循环在 365 天硬上限内必然终止;
//       每个模拟日必须满足守恒不变量
//       stock_end = stock_start + receipts - sales - write_offs
// ==========================================

use crate::domain::batch::{Batch, BatchLedger};
use crate::domain::records::ScheduledReceipt;
use crate::domain::simulation::SimulationDay;
use crate::domain::types::{BatchOrigin, GoverningHorizon};
use crate::engine::horizon::HorizonCalculator;
use crate::MAX_HORIZON_DAYS;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// 浮点库存的耗尽阈值
const QTY_EPSILON: f64 = 1e-9;

// ==========================================
// SimulationParams - 单次推演的输入参数
// ==========================================
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub today: NaiveDate,             // 模拟起始日
    pub horizon_days: i64,            // 前瞻天数 (被硬上限 365 钳制)
    pub avg_daily_sales: f64,         // 平均日销量
    pub shelf_life_at_receiving: i64, // 未来到货的名义保质期
    pub shelf_life_at_store: i64,     // 门店下架提前量
    pub customer_shelf_life: i64,     // 顾客剩余保质期要求
    pub governing: GoverningHorizon,  // 写损口径
    pub keep_day_log: bool,           // 详情模式保留全量日志
}

// ==========================================
// SimulationTrace - 推演轨迹与累计指标
// ==========================================
#[derive(Debug, Clone)]
pub struct SimulationTrace {
    pub day_log: Vec<SimulationDay>, // 仅 keep_day_log 时有内容
    pub total_write_off_qty: f64,    // 写损总量
    pub first_write_off_date: Option<NaiveDate>, // 首次写损日期
    pub peak_early_warning_qty: f64, // 运行期间"预警已过持有量"峰值 (ALD)
    pub final_stock: f64,            // 终局库存
    pub days_simulated: i64,         // 实际推演天数 (<= 365)
}

// ==========================================
// ForwardSimulator - 前瞻模拟引擎
// ==========================================
pub struct ForwardSimulator {
    horizon: HorizonCalculator,
}

impl ForwardSimulator {
    pub fn new() -> Self {
        Self {
            horizon: HorizonCalculator::new(),
        }
    }

    /// 执行逐日推演
    ///
    /// # 参数
    /// - `ledger`: 重建出的初始批次台账 (本次运行独占所有权)
    /// - `scheduled`: 在途订单 (未来到货, 无序)
    /// - `params`: 推演参数
    ///
    /// # 提前终止
    /// 库存归零且当日之后再无在途到货时, 在硬上限之前停止
    pub fn run(
        &self,
        mut ledger: BatchLedger,
        scheduled: &[ScheduledReceipt],
        params: &SimulationParams,
    ) -> SimulationTrace {
        // 在途订单按日期聚合; 过去日期的订单视为陈旧数据, 不参与注入
        let mut receipts_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for receipt in scheduled {
            if receipt.quantity > 0.0 && receipt.delivery_date >= params.today {
                *receipts_by_date.entry(receipt.delivery_date).or_insert(0.0) +=
                    receipt.quantity;
            }
        }

        let horizon_days = params.horizon_days.clamp(0, MAX_HORIZON_DAYS);

        let mut trace = SimulationTrace {
            day_log: Vec::new(),
            total_write_off_qty: 0.0,
            first_write_off_date: None,
            peak_early_warning_qty: 0.0,
            final_stock: 0.0,
            days_simulated: 0,
        };

        for offset in 0..horizon_days {
            let current_date = params.today + Duration::days(offset);
            let stock_start = ledger.total_quantity();

            // 1. 到货注入: 未来到货乐观地按满额名义保质期入账
            //    (模拟时点无从得知其实际批次状态)
            let receipts_today = receipts_by_date.get(&current_date).copied().unwrap_or(0.0);
            if receipts_today > 0.0 {
                let best_before =
                    current_date + Duration::days(params.shelf_life_at_receiving.max(0));
                let horizons = self.horizon.compute(
                    best_before,
                    params.shelf_life_at_store,
                    params.customer_shelf_life,
                    params.governing,
                );

                ledger.insert_sorted(Batch {
                    quantity: receipts_today,
                    best_before_date: best_before,
                    write_off_trigger_date: horizons.write_off_trigger_date,
                    early_warning_date: horizons.early_warning_date,
                    origin: BatchOrigin::Scheduled,
                });
            }

            // 2. 销售消耗: min(平均日销量, 当前库存), FIFO
            let sales = ledger.consume(params.avg_daily_sales);

            // 3. 写损评估: 触发日期已过的批次全量移除
            let write_offs = ledger.write_off_due(current_date);
            if write_offs > 0.0 {
                trace.total_write_off_qty += write_offs;
                if trace.first_write_off_date.is_none() {
                    trace.first_write_off_date = Some(current_date);
                    tracing::debug!(
                        "首次写损: date={}, qty={:.3}",
                        current_date,
                        write_offs
                    );
                }
            }

            // ALD 峰值: 日末持有的、预警日期已过的数量
            let warned_qty = ledger.quantity_past_early_warning(current_date);
            if warned_qty > trace.peak_early_warning_qty {
                trace.peak_early_warning_qty = warned_qty;
            }

            // 4. 记账 (守恒不变量在此成立: 每项动账都经由台账操作)
            let stock_end = ledger.total_quantity();
            trace.days_simulated = offset + 1;

            if params.keep_day_log
                && (sales > 0.0 || receipts_today > 0.0 || write_offs > 0.0)
            {
                let notes = if trace.first_write_off_date == Some(current_date) {
                    Some("首次写损".to_string())
                } else {
                    None
                };

                trace.day_log.push(SimulationDay {
                    date: current_date,
                    stock_start,
                    sales,
                    receipts: receipts_today,
                    write_offs,
                    stock_end,
                    notes,
                });
            }

            // 提前终止: 库存归零且之后再无在途到货
            if stock_end <= QTY_EPSILON
                && receipts_by_date.range(current_date + Duration::days(1)..).next().is_none()
            {
                break;
            }
        }

        trace.final_stock = ledger.total_quantity();
        trace
    }
}

impl Default for ForwardSimulator {
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

    fn params(today: NaiveDate, avg: f64, keep_log: bool) -> SimulationParams {
        SimulationParams {
            today,
            horizon_days: MAX_HORIZON_DAYS,
            avg_daily_sales: avg,
            shelf_life_at_receiving: 10,
            shelf_life_at_store: 5,
            customer_shelf_life: 2,
            governing: GoverningHorizon::StoreShelfLife,
            keep_day_log: keep_log,
        }
    }

    fn ledger_with(qty: f64, bbd: NaiveDate, trigger: NaiveDate, warning: NaiveDate) -> BatchLedger {
        let mut ledger = BatchLedger::new();
        ledger.push_back(Batch {
            quantity: qty,
            best_before_date: bbd,
            write_off_trigger_date: trigger,
            early_warning_date: warning,
            origin: BatchOrigin::Receipt,
        });
        ledger
    }

    #[test]
    fn test_sales_consume_before_trigger_no_write_off() {
        // 100 件, 日销 10, 触发日期在 15 天后: 第 10 天吃光, 零写损
        let today = date(2026, 3, 1);
        let ledger = ledger_with(100.0, date(2026, 3, 21), date(2026, 3, 16), date(2026, 3, 16));

        let trace = ForwardSimulator::new().run(ledger, &[], &params(today, 10.0, true));

        assert_eq!(trace.total_write_off_qty, 0.0);
        assert!(trace.first_write_off_date.is_none());
        assert_eq!(trace.final_stock, 0.0);
        assert_eq!(trace.days_simulated, 10);
        assert_eq!(trace.day_log.len(), 10);
    }

    #[test]
    fn test_expired_batch_written_off_on_day_zero() {
        // 触发日期已在过去: 模拟第 0 天即写损
        let today = date(2026, 3, 1);
        let ledger = ledger_with(30.0, date(2026, 3, 2), date(2026, 2, 25), date(2026, 2, 25));

        let trace = ForwardSimulator::new().run(ledger, &[], &params(today, 0.0, true));

        assert_eq!(trace.total_write_off_qty, 30.0);
        assert_eq!(trace.first_write_off_date, Some(today));
        assert_eq!(trace.final_stock, 0.0);
        // 日志首条即写损记录
        let first = &trace.day_log[0];
        assert_eq!(first.date, today);
        assert_eq!(first.write_offs, 30.0);
        assert!(first.conservation_holds());
        assert_eq!(first.notes.as_deref(), Some("首次写损"));
    }

    #[test]
    fn test_scheduled_receipt_injected_with_nominal_shelf_life() {
        let today = date(2026, 3, 1);
        let scheduled = vec![ScheduledReceipt {
            delivery_date: date(2026, 3, 5),
            quantity: 20.0,
        }];

        let trace =
            ForwardSimulator::new().run(BatchLedger::new(), &scheduled, &params(today, 4.0, true));

        // 3/5 注入 20 件, 名义保质期 10 天 → 触发 3/6 (bbd 3/15 - 门店 5 + ... )
        // 日销 4: 3/5 起 5 天吃光, 无写损
        assert_eq!(trace.total_write_off_qty, 0.0);
        assert_eq!(trace.final_stock, 0.0);
        let injection_day = trace.day_log.iter().find(|d| d.receipts > 0.0).unwrap();
        assert_eq!(injection_day.date, date(2026, 3, 5));
        assert_eq!(injection_day.receipts, 20.0);
        assert!(injection_day.conservation_holds());
    }

    #[test]
    fn test_early_termination_when_stock_zero_and_no_future_receipts() {
        let today = date(2026, 3, 1);
        let ledger = ledger_with(5.0, date(2026, 6, 1), date(2026, 5, 27), date(2026, 5, 27));

        let trace = ForwardSimulator::new().run(ledger, &[], &params(today, 5.0, false));

        // 第 1 天吃光即停止, 远未达到 365 天上限
        assert_eq!(trace.days_simulated, 1);
    }

    #[test]
    fn test_loop_never_exceeds_hard_bound() {
        // 无销售、无写损风险的死库存: 只能靠硬上限终止
        let today = date(2026, 3, 1);
        let ledger = ledger_with(50.0, date(2036, 1, 1), date(2035, 12, 27), date(2035, 12, 27));

        let mut p = params(today, 0.0, false);
        p.horizon_days = 100_000; // 恶意参数也会被钳制
        let trace = ForwardSimulator::new().run(ledger, &[], &p);

        assert_eq!(trace.days_simulated, MAX_HORIZON_DAYS);
        assert_eq!(trace.final_stock, 50.0);
    }

    #[test]
    fn test_peak_early_warning_tracked() {
        // 预警日期已过但触发日期未到: 计入 ALD 峰值而不写损
        let today = date(2026, 3, 1);
        let ledger = ledger_with(40.0, date(2026, 3, 10), date(2026, 3, 8), date(2026, 2, 20));

        let mut p = params(today, 0.0, false);
        p.horizon_days = 3;
        let trace = ForwardSimulator::new().run(ledger, &[], &p);

        assert_eq!(trace.total_write_off_qty, 0.0);
        assert_eq!(trace.peak_early_warning_qty, 40.0);
    }

    #[test]
    fn test_conservation_holds_across_mixed_days() {
        let today = date(2026, 3, 1);
        let ledger = ledger_with(12.0, date(2026, 3, 4), date(2026, 3, 3), date(2026, 3, 2));
        let scheduled = vec![ScheduledReceipt {
            delivery_date: date(2026, 3, 2),
            quantity: 8.0,
        }];

        let trace = ForwardSimulator::new().run(ledger, &scheduled, &params(today, 3.0, true));

        for day in &trace.day_log {
            assert!(day.conservation_holds(), "守恒不变量被破坏: {:?}", day);
        }
    }

    #[test]
    fn test_stale_scheduled_receipt_ignored() {
        // 到货日期早于今天的在途订单是陈旧数据, 不注入也不阻止提前终止
        let today = date(2026, 3, 1);
        let scheduled = vec![ScheduledReceipt {
            delivery_date: date(2026, 2, 20),
            quantity: 100.0,
        }];

        let trace =
            ForwardSimulator::new().run(BatchLedger::new(), &scheduled, &params(today, 5.0, true));

        assert_eq!(trace.final_stock, 0.0);
        assert_eq!(trace.days_simulated, 1);
        assert!(trace.day_log.is_empty());
    }
}
