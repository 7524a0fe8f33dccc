// ==========================================
// 保质期写损预测系统 - 后台扫描执行器
// ==========================================
// 职责: 把 O(365 × 产品数) 的批量扫描挪到隔离的后台执行上下文,
//       通过单向消息把进度与终局结果传回宿主
// 契约: 一发一收 + 周期性进度通知; 消息全量拷入拷出, 不跨边界共享引用
// 取消语义: 粗粒度 —— 宿主丢弃接收端即视为放弃本次扫描,
//           不存在运行中的协作式取消或部分结果交付
// ==========================================

use crate::api::{BulkScanRequest, ScanApi};
use crate::domain::simulation::{BulkScanEntry, ScanProgress};
use crate::engine::ScanProgressPublisher;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

// ==========================================
// ScanMessage - 后台扫描 → 宿主的单向消息
// ==========================================
#[derive(Debug)]
pub enum ScanMessage {
    /// 进度通知 (每 N 个产品及完成时)
    Progress(ScanProgress),
    /// 终局结果 (按写损金额降序的风险产品列表, 或扫描级错误)
    Finished(Result<Vec<BulkScanEntry>, String>),
}

// ==========================================
// ChannelProgressPublisher - 通道进度适配器
// ==========================================
// ScanProgressPublisher 的通道实现; 发送失败(宿主已放弃)静默忽略
struct ChannelProgressPublisher {
    tx: UnboundedSender<ScanMessage>,
}

impl ScanProgressPublisher for ChannelProgressPublisher {
    fn publish(&self, progress: ScanProgress) {
        let _ = self.tx.send(ScanMessage::Progress(progress));
    }
}

// ==========================================
// ScanWorker - 后台扫描执行器
// ==========================================
pub struct ScanWorker {
    scan_api: Arc<ScanApi>,
}

impl ScanWorker {
    pub fn new(scan_api: Arc<ScanApi>) -> Self {
        Self { scan_api }
    }

    /// 启动一次后台扫描 (以当前日期为模拟起点)
    ///
    /// # 返回
    /// 消息接收端: 若干 Progress 后跟恰好一条 Finished
    pub fn spawn(&self, request: BulkScanRequest) -> UnboundedReceiver<ScanMessage> {
        self.spawn_inner(request, None)
    }

    /// 启动一次后台扫描 (显式模拟起点, 测试与回放用)
    pub fn spawn_at(
        &self,
        request: BulkScanRequest,
        today: NaiveDate,
    ) -> UnboundedReceiver<ScanMessage> {
        self.spawn_inner(request, Some(today))
    }

    fn spawn_inner(
        &self,
        request: BulkScanRequest,
        today: Option<NaiveDate>,
    ) -> UnboundedReceiver<ScanMessage> {
        let (tx, rx) = unbounded_channel();
        let scan_api = self.scan_api.clone();

        // 扫描是同步的 SQLite + CPU 工作: 放到阻塞线程池,
        // 不占用异步运行时的核心线程
        tokio::task::spawn_blocking(move || {
            let publisher = ChannelProgressPublisher { tx: tx.clone() };

            let result = match today {
                Some(t) => scan_api.run_scan_at(&request, t, &publisher),
                None => scan_api.run_scan(&request, &publisher),
            };

            let _ = tx.send(ScanMessage::Finished(result.map_err(|e| e.to_string())));
        });

        rx
    }
}
