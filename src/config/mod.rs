// ==========================================
// 保质期写损预测系统 - 配置层
// ==========================================
// 职责: 系统配置的加载与默认值
// ==========================================

pub mod config_manager;

pub use config_manager::ConfigManager;
