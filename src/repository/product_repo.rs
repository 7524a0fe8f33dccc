// ==========================================
// 保质期写损预测系统 - 产品快照仓储
// ==========================================
// 职责: 管理 product 表的查询 (按仓库+产品键取快照 / 扫描候选集)
// 红线: Repository 不含业务逻辑, 只负责数据访问与字段归一化
// ==========================================

use crate::domain::dates::normalize_quantity;
use crate::domain::product::ProductSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 产品快照仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<ProductSnapshot> {
        Ok(ProductSnapshot {
            warehouse_id: row.get(0)?,
            product_id: row.get(1)?,
            item_group_id: row.get(2)?,
            status_id: row.get(3)?,
            shelf_life_at_receiving: row.get(4)?,
            shelf_life_at_store: row.get(5)?,
            customer_shelf_life: row.get(6)?,
            price: normalize_quantity(row.get(7)?),
            stock_on_hand: normalize_quantity(row.get(8)?),
            unprocessed_delivery_qty: normalize_quantity(row.get(9)?),
        })
    }

    const COLUMNS: &'static str = "warehouse_id, product_id, item_group_id, status_id, \
         shelf_life_at_receiving, shelf_life_at_store, customer_shelf_life, \
         price, stock_on_hand, unprocessed_delivery_qty";

    /// 按仓库+产品键取产品快照
    ///
    /// # 返回
    /// - Ok(Some): 找到产品
    /// - Ok(None): 产品不存在 (调用方决定是否快速失败)
    pub fn find_by_key(
        &self,
        warehouse_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Option<ProductSnapshot>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            &format!(
                "SELECT {} FROM product WHERE warehouse_id = ?1 AND product_id = ?2",
                Self::COLUMNS
            ),
            params![warehouse_id, product_id],
            Self::map_row,
        );

        match result {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 批量扫描候选集查询
    ///
    /// # 参数
    /// - warehouse_ids: 仓库筛选 (空 = 不筛选)
    /// - item_group_ids: 商品组筛选 (空 = 不筛选)
    /// - status_ids: 状态筛选 (空 = 不筛选)
    ///
    /// # 返回
    /// 稳定顺序 (仓库+产品键升序) 的候选产品快照列表
    pub fn list_candidates(
        &self,
        warehouse_ids: &[String],
        item_group_ids: &[String],
        status_ids: &[String],
    ) -> RepositoryResult<Vec<ProductSnapshot>> {
        let conn = self.get_conn()?;

        let mut sql = format!("SELECT {} FROM product WHERE 1=1", Self::COLUMNS);
        let mut bound: Vec<String> = Vec::new();

        for (column, values) in [
            ("warehouse_id", warehouse_ids),
            ("item_group_id", item_group_ids),
            ("status_id", status_ids),
        ] {
            if !values.is_empty() {
                let placeholders = (bound.len() + 1..=bound.len() + values.len())
                    .map(|i| format!("?{}", i))
                    .collect::<Vec<_>>()
                    .join(", ");
                sql.push_str(&format!(" AND {} IN ({})", column, placeholders));
                bound.extend(values.iter().cloned());
            }
        }

        sql.push_str(" ORDER BY warehouse_id, product_id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(bound.iter()),
            Self::map_row,
        )?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row?);
        }
        Ok(candidates)
    }
}
