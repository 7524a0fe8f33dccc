// ==========================================
// 保质期写损预测系统 - 历史收货仓储
// ==========================================
// 职责: 按仓库+产品键取全部历史收货记录
// 红线: Repository 不含业务逻辑; 坏字段在此归一化
//       (坏日期 → 最早排序哨兵, 坏数量 → 0), 不向上抛错
// ==========================================

use crate::domain::dates::{normalize_quantity, parse_date};
use crate::domain::records::ReceiptRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ReceiptRepository - 历史收货仓储
// ==========================================
pub struct ReceiptRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReceiptRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按仓库+产品键取全部历史收货 (有限的无序集合)
    pub fn list_by_key(
        &self,
        warehouse_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Vec<ReceiptRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT delivery_date, best_before_date, quantity \
             FROM receipt WHERE warehouse_id = ?1 AND product_id = ?2",
        )?;

        let rows = stmt.query_map(params![warehouse_id, product_id], |row| {
            let delivery_raw: String = row.get(0)?;
            let bbd_raw: String = row.get(1)?;
            let quantity: f64 = row.get(2)?;
            Ok(ReceiptRecord {
                delivery_date: parse_date(&delivery_raw),
                best_before_date: parse_date(&bbd_raw),
                quantity: normalize_quantity(quantity),
            })
        })?;

        let mut receipts = Vec::new();
        for row in rows {
            receipts.push(row?);
        }
        Ok(receipts)
    }
}
