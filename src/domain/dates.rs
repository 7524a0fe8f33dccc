// ==========================================
// 保质期写损预测系统 - 日期解析
// ==========================================
// 红线: 全系统只有一个日期解析器和一个"无法解析"哨兵。
// 任何一条历史记录的坏日期都不允许中断整个产品的模拟,
// 归一到最早排序的哨兵日期(接受其可能扭曲该条记录的 FIFO 顺序)。
// ==========================================

use chrono::NaiveDate;

/// 无法解析的日期哨兵（排序最早）
///
/// 哨兵早于任何真实业务日期, 使坏记录在 FIFO 消耗中最先被吃掉,
/// 与悲观重建的方向一致。
pub fn unparseable_date_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("固定哨兵日期必然合法")
}

/// 唯一的日期解析入口
///
/// 接受 ISO 8601 日期 (YYYY-MM-DD) 以及带时间后缀的变体
/// (YYYY-MM-DDTHH:MM:SS / "YYYY-MM-DD HH:MM:SS")。
/// 其他任何格式一律归一为哨兵日期, 不报错。
pub fn parse_date(raw: &str) -> NaiveDate {
    let s = raw.trim();
    if s.is_empty() {
        return unparseable_date_sentinel();
    }

    // 带时间后缀的情况只取日期部分
    let date_part = s
        .split_once('T')
        .map(|(d, _)| d)
        .or_else(|| s.split_once(' ').map(|(d, _)| d))
        .unwrap_or(s);

    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            tracing::debug!("日期无法解析, 归一为哨兵: raw={}", raw);
            unparseable_date_sentinel()
        }
    }
}

/// 归一化数量字段: 负数或非有限值归零
pub fn normalize_quantity(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}
