// ==========================================
// 保质期写损预测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读取时的偶发 busy 错误
// - 提供记录库建表入口（产品/历史收货/在途订单/历史销售）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化记录库 schema（幂等）
///
/// 记录库是只读数据提供方：产品快照、历史收货、在途订单、历史销售。
/// 模拟结果不落库（每次运行都是显式的快照计算）。
///
/// 日期列统一为 TEXT（ISO 8601 / YYYY-MM-DD），由领域层的唯一解析器
/// `domain::dates::parse_date` 负责解读；无法解析的值归一为哨兵日期。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS product (
            warehouse_id            TEXT NOT NULL,
            product_id              TEXT NOT NULL,
            item_group_id           TEXT NOT NULL DEFAULT '',
            status_id               TEXT NOT NULL DEFAULT '',
            shelf_life_at_receiving INTEGER NOT NULL DEFAULT 0,
            shelf_life_at_store     INTEGER NOT NULL DEFAULT 0,
            customer_shelf_life     INTEGER NOT NULL DEFAULT 0,
            price                   REAL NOT NULL DEFAULT 0,
            stock_on_hand           REAL NOT NULL DEFAULT 0,
            unprocessed_delivery_qty REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (warehouse_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS receipt (
            warehouse_id     TEXT NOT NULL,
            product_id       TEXT NOT NULL,
            delivery_date    TEXT NOT NULL,
            best_before_date TEXT NOT NULL,
            quantity         REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_receipt_key ON receipt(warehouse_id, product_id);

        CREATE TABLE IF NOT EXISTS open_order (
            warehouse_id  TEXT NOT NULL,
            product_id    TEXT NOT NULL,
            delivery_date TEXT NOT NULL,
            quantity      REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_open_order_key ON open_order(warehouse_id, product_id);

        CREATE TABLE IF NOT EXISTS sale (
            warehouse_id TEXT NOT NULL,
            product_id   TEXT NOT NULL,
            sale_date    TEXT NOT NULL,
            quantity     REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_sale_key ON sale(warehouse_id, product_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}
