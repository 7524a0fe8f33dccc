// ==========================================
// 保质期写损预测系统 - 在途订单仓储
// ==========================================
// 职责: 按仓库+产品键取未到货的在途订单
// 红线: Repository 不含业务逻辑; 坏字段在此归一化
// ==========================================

use crate::domain::dates::{normalize_quantity, parse_date};
use crate::domain::records::ScheduledReceipt;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// OpenOrderRepository - 在途订单仓储
// ==========================================
pub struct OpenOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OpenOrderRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按仓库+产品键取全部在途订单 (有限的无序集合)
    pub fn list_by_key(
        &self,
        warehouse_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Vec<ScheduledReceipt>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT delivery_date, quantity \
             FROM open_order WHERE warehouse_id = ?1 AND product_id = ?2",
        )?;

        let rows = stmt.query_map(params![warehouse_id, product_id], |row| {
            let delivery_raw: String = row.get(0)?;
            let quantity: f64 = row.get(1)?;
            Ok(ScheduledReceipt {
                delivery_date: parse_date(&delivery_raw),
                quantity: normalize_quantity(quantity),
            })
        })?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?);
        }
        Ok(orders)
    }
}
