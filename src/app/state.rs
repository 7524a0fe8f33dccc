// ==========================================
// 保质期写损预测系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 记录库连接在仓储之间共享 (Arc<Mutex<Connection>>);
//       模拟本身无共享可变状态, 每次运行独占自己的批次台账
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ForecastApi, ScanApi};
use crate::config::ConfigManager;
use crate::repository::{
    OpenOrderRepository, ProductRepository, ReceiptRepository, SaleRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 详情预测API
    pub forecast_api: Arc<ForecastApi>,

    /// 批量扫描API
    pub scan_api: Arc<ScanApi>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开记录库连接并初始化 schema（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("无法初始化 schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================

        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let receipt_repo = Arc::new(ReceiptRepository::from_connection(conn.clone()));
        let order_repo = Arc::new(OpenOrderRepository::from_connection(conn.clone()));
        let sale_repo = Arc::new(SaleRepository::from_connection(conn.clone()));

        // 配置管理器
        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================

        let forecast_api = Arc::new(ForecastApi::new(
            product_repo.clone(),
            receipt_repo.clone(),
            order_repo.clone(),
            sale_repo.clone(),
            config.clone(),
        ));

        let scan_api = Arc::new(ScanApi::new(
            product_repo,
            receipt_repo,
            order_repo,
            sale_repo,
            config.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            forecast_api,
            scan_api,
            config,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 SHELFLIFE_FORECAST_DB_PATH 优先
/// - 否则: 用户数据目录/shelflife-forecast/shelflife_forecast.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("SHELFLIFE_FORECAST_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./shelflife_forecast.db");

    if let Some(data_dir) = dirs::data_dir() {
        path = data_dir.join("shelflife-forecast");
        std::fs::create_dir_all(&path).ok();
        path = path.join("shelflife_forecast.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
