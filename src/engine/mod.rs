// ==========================================
// 保质期写损预测系统 - 引擎层
// ==========================================
// 职责: 实现模拟业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 引擎是纯函数式的无状态组件,
//       同一份输入快照必然得到同一份输出
// ==========================================

pub mod aggregate;
pub mod demand;
pub mod events;
pub mod horizon;
pub mod reconstruct;
pub mod simulator;

// 重导出核心引擎
pub use aggregate::ResultAggregator;
pub use demand::DemandEstimator;
pub use events::{NoOpProgressPublisher, ScanProgressPublisher};
pub use horizon::{BatchHorizons, HorizonCalculator};
pub use reconstruct::{BatchReconstructor, Reconstruction};
pub use simulator::{ForwardSimulator, SimulationParams, SimulationTrace};
