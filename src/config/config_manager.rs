// ==========================================
// 保质期写损预测系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、默认值管理
// 存储: config_kv 表 (key-value)
// 配置项:
// - simulation/horizon_days            前瞻天数 (默认 365, 被硬上限钳制)
// - simulation/progress_interval       扫描进度节奏 (默认每 10 个产品)
// - simulation/detailed_governing_horizon  详情模式写损口径 (默认门店)
// - simulation/scan_governing_horizon      批量扫描写损口径 (默认顾客)
// ==========================================

use crate::domain::types::GoverningHorizon;
use crate::MAX_HORIZON_DAYS;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值 (upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    /// 前瞻天数 (默认 365, 永远不超过硬上限)
    pub fn get_horizon_days(&self) -> Result<i64, Box<dyn Error>> {
        let days = self
            .get_config_value("simulation/horizon_days")?
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(MAX_HORIZON_DAYS);

        Ok(days.clamp(0, MAX_HORIZON_DAYS))
    }

    /// 扫描进度节奏 (默认每 10 个产品发布一次)
    pub fn get_progress_interval(&self) -> Result<usize, Box<dyn Error>> {
        let interval = self
            .get_config_value("simulation/progress_interval")?
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        Ok(interval)
    }

    /// 详情模式的写损口径 (默认门店下架口径, 与历史行为一致)
    pub fn get_detailed_governing_horizon(&self) -> Result<GoverningHorizon, Box<dyn Error>> {
        Ok(self
            .get_config_value("simulation/detailed_governing_horizon")?
            .map(|v| GoverningHorizon::from_str(&v))
            .unwrap_or(GoverningHorizon::StoreShelfLife))
    }

    /// 批量扫描的写损口径 (默认顾客口径, 与历史行为一致;
    /// 门店口径日期始终作为 ALD 预警单独跟踪)
    pub fn get_scan_governing_horizon(&self) -> Result<GoverningHorizon, Box<dyn Error>> {
        Ok(self
            .get_config_value("simulation/scan_governing_horizon")?
            .map(|v| GoverningHorizon::from_str(&v))
            .unwrap_or(GoverningHorizon::CustomerShelfLife))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let mgr = manager();
        assert_eq!(mgr.get_horizon_days().unwrap(), MAX_HORIZON_DAYS);
        assert_eq!(mgr.get_progress_interval().unwrap(), 10);
        assert_eq!(
            mgr.get_detailed_governing_horizon().unwrap(),
            GoverningHorizon::StoreShelfLife
        );
        assert_eq!(
            mgr.get_scan_governing_horizon().unwrap(),
            GoverningHorizon::CustomerShelfLife
        );
    }

    #[test]
    fn test_horizon_days_is_clamped() {
        let mgr = manager();
        mgr.set_config_value("simulation/horizon_days", "9999").unwrap();
        assert_eq!(mgr.get_horizon_days().unwrap(), MAX_HORIZON_DAYS);

        mgr.set_config_value("simulation/horizon_days", "30").unwrap();
        assert_eq!(mgr.get_horizon_days().unwrap(), 30);
    }

    #[test]
    fn test_governing_horizon_override() {
        let mgr = manager();
        mgr.set_config_value("simulation/scan_governing_horizon", "STORE_SHELF_LIFE")
            .unwrap();
        assert_eq!(
            mgr.get_scan_governing_horizon().unwrap(),
            GoverningHorizon::StoreShelfLife
        );
    }

    #[test]
    fn test_invalid_progress_interval_falls_back() {
        let mgr = manager();
        mgr.set_config_value("simulation/progress_interval", "0").unwrap();
        assert_eq!(mgr.get_progress_interval().unwrap(), 10);
    }
}
