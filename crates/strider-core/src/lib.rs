//! # Strider Core
//!
//! 导航栈的共享状态与纯策略逻辑（无线程、无调度）
//!
//! ## 模块
//!
//! - `state`: 传感器状态存储、决策槽、目标槽（无锁原子替换）
//! - `mode`: 系统运行模式及其原子封装
//! - `freshness`: 数据新鲜度判定
//! - `safety`: 速度限幅与障碍接近保护
//! - `config`: 运行时配置（TOML + 校验）
//! - `error`: 配置错误类型
//!
//! ## 并发模型
//!
//! 高频数据（传感器通道、决策、目标）全部走 `ArcSwap` 整体替换：
//! 生产者 store 一个新分配的记录，读者 load 得到一致的快照副本，
//! 任何锁都不会跨越一个控制周期。低频诊断数据走 `RwLock`。

pub mod config;
pub mod error;
pub mod freshness;
pub mod mode;
pub mod safety;
pub mod state;

// 重新导出常用类型
pub use config::RuntimeConfig;
pub use error::ConfigError;
pub use freshness::{FreshnessPolicy, HoldReason};
pub use mode::{AtomicSystemMode, SystemMode};
pub use safety::{SafetyGate, SafetyLimits};
pub use state::{
    Channel, Decision, Diagnostics, RobotContext, SensorSnapshot, SnapshotStamps, Stamped,
};
