// ==========================================
// 保质期写损预测系统 - 详情预测 API
// ==========================================
// 职责: 单产品的显式预测请求 → 完整模拟结果 (带全量日志)
// 架构: API 层 → Repository (只读快照) → Engine (纯函数推演)
// 红线: 产品未找到快速失败, 不做任何模拟
// 红线: 输入快照只取一次, 运行期间不重新读取
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::product::ProductSnapshot;
use crate::domain::records::{ManualDelivery, ScheduledReceipt, ShelfLifeOverrides};
use crate::domain::simulation::SimulationOutcome;
use crate::domain::types::GoverningHorizon;
use crate::engine::{
    BatchReconstructor, DemandEstimator, ForwardSimulator, ResultAggregator, SimulationParams,
};
use crate::repository::{
    OpenOrderRepository, ProductRepository, ReceiptRepository, SaleRepository,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// DetailedForecastRequest - 详情模式请求
// ==========================================
// 覆写字段与人工补录到货是一等模拟参数:
// 覆写替换快照中的保质期天数, 补录到货并入在途订单集合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedForecastRequest {
    pub warehouse_id: String,
    pub product_id: String,

    /// 写损口径覆写 (None = 使用配置的详情模式默认口径)
    #[serde(default)]
    pub governing_horizon: Option<GoverningHorizon>,

    /// 保质期参数覆写 (None 字段沿用产品快照)
    #[serde(default)]
    pub shelf_life_overrides: Option<ShelfLifeOverrides>,

    /// 人工补录的未来到货
    #[serde(default)]
    pub manual_deliveries: Vec<ManualDelivery>,
}

// ==========================================
// ForecastApi - 详情预测 API
// ==========================================
pub struct ForecastApi {
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

impl ForecastApi {
    /// 创建新的 ForecastApi 实例
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

    /// 执行详情模式预测 (以当前日期为模拟起点)
    pub fn run_detailed(&self, request: &DetailedForecastRequest) -> ApiResult<SimulationOutcome> {
        let today = chrono::Local::now().date_naive();
        self.run_detailed_at(request, today)
    }

    /// 执行详情模式预测 (显式模拟起点, 测试与回放用)
    ///
    /// # 流程
    /// 1. 取产品快照 (未找到 → 快速失败)
    /// 2. 应用保质期覆写
    /// 3. 取历史收货/在途订单/历史销售 (一次性快照)
    /// 4. 人工补录到货并入在途订单
    /// 5. 需求估算 → 批次重建 → 前瞻推演 → 结果聚合
    ///
    /// # 说明
    /// 零销量产品仍返回结果 (days_of_stock = Infinity), 与批量扫描不同
    pub fn run_detailed_at(
        &self,
        request: &DetailedForecastRequest,
        today: NaiveDate,
    ) -> ApiResult<SimulationOutcome> {
        if request.warehouse_id.trim().is_empty() || request.product_id.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "仓库标识与产品标识不能为空".to_string(),
            ));
        }

        // 1. 产品快照 (快速失败)
        let snapshot = self
            .product_repo
            .find_by_key(&request.warehouse_id, &request.product_id)?
            .ok_or_else(|| ApiError::ProductNotFound {
                warehouse_id: request.warehouse_id.clone(),
                product_id: request.product_id.clone(),
            })?;

        // 2. 保质期覆写
        let snapshot = apply_overrides(snapshot, request.shelf_life_overrides.as_ref());

        // 3. 一次性输入快照
        let receipts = self
            .receipt_repo
            .list_by_key(&request.warehouse_id, &request.product_id)?;
        let mut scheduled = self
            .order_repo
            .list_by_key(&request.warehouse_id, &request.product_id)?;
        let sales = self
            .sale_repo
            .list_by_key(&request.warehouse_id, &request.product_id)?;

        // 4. 人工补录到货
        scheduled.extend(
            request
                .manual_deliveries
                .iter()
                .cloned()
                .map(ScheduledReceipt::from),
        );

        // 5. 引擎流水线
        let avg_daily_sales = self.demand.estimate(&sales);

        let governing = match request.governing_horizon {
            Some(g) => g,
            None => self
                .config
                .get_detailed_governing_horizon()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        };
        let horizon_days = self
            .config
            .get_horizon_days()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

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
            keep_day_log: true,
        };

        let trace = self
            .simulator
            .run(reconstruction.ledger.clone(), &scheduled, &params);

        tracing::debug!(
            "详情预测完成: warehouse={}, product={}, write_off_qty={:.3}, days_simulated={}",
            request.warehouse_id,
            request.product_id,
            trace.total_write_off_qty,
            trace.days_simulated
        );

        Ok(self.aggregator.detailed_outcome(
            &snapshot,
            avg_daily_sales,
            &reconstruction.ledger,
            reconstruction.is_complete,
            trace,
        ))
    }
}

/// 把请求中的保质期覆写应用到快照副本上
fn apply_overrides(
    mut snapshot: ProductSnapshot,
    overrides: Option<&ShelfLifeOverrides>,
) -> ProductSnapshot {
    if let Some(o) = overrides {
        if let Some(v) = o.shelf_life_at_receiving {
            snapshot.shelf_life_at_receiving = v;
        }
        if let Some(v) = o.shelf_life_at_store {
            snapshot.shelf_life_at_store = v;
        }
        if let Some(v) = o.customer_shelf_life {
            snapshot.customer_shelf_life = v;
        }
    }
    snapshot
}
