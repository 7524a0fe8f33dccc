// ==========================================
// 保质期写损预测系统 - 扫描进度发布
// ==========================================
// 职责: 定义扫描进度发布 trait, 实现依赖倒置
// 说明: Engine/API 层定义 trait, 应用层用通道实现适配器
// 优势: 扫描逻辑不依赖具体的宿主通信方式
// ==========================================

use crate::domain::simulation::ScanProgress;

// ==========================================
// 进度发布 Trait
// ==========================================

/// 扫描进度发布者 Trait
///
/// 批量扫描按固定节奏(每 N 个产品及完成时)发布 {processed, total},
/// 发布是单向的尽力而为: 发布失败不中断扫描
pub trait ScanProgressPublisher: Send + Sync {
    /// 发布一次进度通知
    fn publish(&self, progress: ScanProgress);
}

/// 空操作进度发布者
///
/// 用于不需要进度通知的场景（如单元测试、单发请求）
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressPublisher;

impl ScanProgressPublisher for NoOpProgressPublisher {
    fn publish(&self, progress: ScanProgress) {
        tracing::trace!(
            "NoOpProgressPublisher: 跳过进度发布 - {}/{}",
            progress.processed,
            progress.total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 收集型发布者: 测试断言进度节奏用
    #[derive(Default)]
    pub struct CollectingPublisher {
        pub seen: Mutex<Vec<ScanProgress>>,
    }

    impl ScanProgressPublisher for CollectingPublisher {
        fn publish(&self, progress: ScanProgress) {
            self.seen.lock().unwrap().push(progress);
        }
    }

    #[test]
    fn test_noop_publisher_does_not_panic() {
        let publisher = NoOpProgressPublisher;
        publisher.publish(ScanProgress {
            processed: 10,
            total: 100,
        });
    }

    #[test]
    fn test_collecting_publisher() {
        let publisher = CollectingPublisher::default();
        publisher.publish(ScanProgress {
            processed: 10,
            total: 20,
        });

        let seen = publisher.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].processed, 10);
    }
}
