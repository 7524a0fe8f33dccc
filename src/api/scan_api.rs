// ==========================================
// 保质期写损预测系统 - 批量扫描 API
// ==========================================
// 职责: 候选产品集的顺序扫描, 只上报有可度量风险的产品
// 红线: 单品失败单独捕获并记日志, 跳过该产品继续扫描,
//       进度分母不受失败影响
// 红线: 零销量产品直接排除 (分类为零风险, 不产生结果)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::product::ProductSnapshot;
use crate::domain::simulation::{BulkScanEntry, ScanProgress};
use crate::domain::types::GoverningHorizon;
use crate::engine::{
    BatchReconstructor, DemandEstimator, ForwardSimulator, ResultAggregator, ScanProgressPublisher,
    SimulationParams,
};
use crate::repository::error::RepositoryResult;
use crate::repository::{
    OpenOrderRepository, ProductRepository, ReceiptRepository, SaleRepository,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// BulkScanRequest - 批量扫描请求
// ==========================================
// 三个筛选维度都是"空 = 不筛选"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkScanRequest {
    #[serde(default)]
    pub warehouse_ids: Vec<String>,
    #[serde(default)]
    pub item_group_ids: Vec<String>,
    #[serde(default)]
    pub status_ids: Vec<String>,
}

// ==========================================
// ScanApi - 批量扫描 API
// ==========================================
pub struct ScanApi {
    product_repo: Arc<ProductRepository>,
    receipt_repo: Arc<ReceiptRepository>,
    order_repo: Arc<OpenOrderRepository>,
    sale_repo: Arc<SaleRepository>,
    config: Arc<ConfigManager>,

    demand: DemandEstimator,
    reconstructor: BatchReconstructor,
    simulator: ForwardSimulator,
    aggregator: ResultAggregator,
}

impl ScanApi {
    /// 创建新的 ScanApi 实例
    pub fn new(
        product_repo: Arc<ProductRepository>,
        receipt_repo: Arc<ReceiptRepository>,
        order_repo: Arc<OpenOrderRepository>,
        sale_repo: Arc<SaleRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            product_repo,
            receipt_repo,
            order_repo,
            sale_repo,
            config,
            demand: DemandEstimator::new(),
            reconstructor: BatchReconstructor::new(),
            simulator: ForwardSimulator::new(),
            aggregator: ResultAggregator::new(),
        }
    }

    /// 执行批量扫描 (以当前日期为模拟起点)
    pub fn run_scan(
        &self,
        request: &BulkScanRequest,
        publisher: &dyn ScanProgressPublisher,
    ) -> ApiResult<Vec<BulkScanEntry>> {
        let today = chrono::Local::now().date_naive();
        self.run_scan_at(request, today, publisher)
    }

    /// 执行批量扫描 (显式模拟起点, 测试与回放用)
    ///
    /// # 流程
    /// 1. 取候选产品集 (总数即进度分母, 之后不再变化)
    /// 2. 顺序逐品模拟; 单品失败 → warn 日志 + 跳过
    /// 3. 按固定节奏 (每 N 个产品及完成时) 发布 {processed, total}
    /// 4. 结果按 写损金额降序 → ALD 金额降序 → 产品标识升序 排序
    pub fn run_scan_at(
        &self,
        request: &BulkScanRequest,
        today: NaiveDate,
        publisher: &dyn ScanProgressPublisher,
    ) -> ApiResult<Vec<BulkScanEntry>> {
        let candidates = self.product_repo.list_candidates(
            &request.warehouse_ids,
            &request.item_group_ids,
            &request.status_ids,
        )?;

        let total = candidates.len();
        let interval = self
            .config
            .get_progress_interval()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let governing = self
            .config
            .get_scan_governing_horizon()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let horizon_days = self
            .config
            .get_horizon_days()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        tracing::info!("批量扫描开始: candidates={}", total);

        let mut entries = Vec::new();
        let mut processed = 0usize;

        for snapshot in &candidates {
            match self.scan_one(snapshot, today, governing, horizon_days) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    // 零销量或零风险: 按规则省略
                }
                Err(e) => {
                    // 单品失败不中断扫描, 分母不变
                    tracing::warn!(
                        "单品扫描失败, 已跳过: warehouse={}, product={}, error={}",
                        snapshot.warehouse_id,
                        snapshot.product_id,
                        e
                    );
                }
            }

            processed += 1;
            if processed % interval == 0 || processed == total {
                publisher.publish(ScanProgress { processed, total });
            }
        }

        self.aggregator.sort_entries(&mut entries);

        tracing::info!(
            "批量扫描完成: candidates={}, reported={}",
            total,
            entries.len()
        );
        Ok(entries)
    }

    /// 单产品扫描
    ///
    /// # 返回
    /// - Ok(Some): 有可度量风险, 进入结果集
    /// - Ok(None): 零销量 (分类为零风险, 提前退出) 或零风险省略
    fn scan_one(
        &self,
        snapshot: &ProductSnapshot,
        today: NaiveDate,
        governing: GoverningHorizon,
        horizon_days: i64,
    ) -> RepositoryResult<Option<BulkScanEntry>> {
        // 零销量提前退出: 不再拉取收货/订单, 不模拟
        let sales = self
            .sale_repo
            .list_by_key(&snapshot.warehouse_id, &snapshot.product_id)?;
        let avg_daily_sales = self.demand.estimate(&sales);
        if avg_daily_sales <= 0.0 {
            return Ok(None);
        }

        let receipts = self
            .receipt_repo
            .list_by_key(&snapshot.warehouse_id, &snapshot.product_id)?;
        let scheduled = self
            .order_repo
            .list_by_key(&snapshot.warehouse_id, &snapshot.product_id)?;

        let reconstruction = self.reconstructor.reconstruct(
            snapshot.effective_on_hand(),
            &receipts,
            today,
            snapshot.shelf_life_at_store,
            snapshot.customer_shelf_life,
            governing,
        );

        let params = SimulationParams {
            today,
            horizon_days,
            avg_daily_sales,
            shelf_life_at_receiving: snapshot.shelf_life_at_receiving,
            shelf_life_at_store: snapshot.shelf_life_at_store,
            customer_shelf_life: snapshot.customer_shelf_life,
            governing,
            keep_day_log: false,
        };

        let trace = self.simulator.run(reconstruction.ledger, &scheduled, &params);

        Ok(self.aggregator.bulk_entry(
            snapshot,
            avg_daily_sales,
            &receipts,
            reconstruction.is_complete,
            &trace,
        ))
    }
}
