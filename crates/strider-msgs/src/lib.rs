//! # Strider Messages
//!
//! 导航栈各层共享的消息类型（无传输层依赖）
//!
//! ## 模块
//!
//! - `scan`: 平面激光扫描
//! - `imu`: 惯性测量采样
//! - `pose`: 平面位姿与导航目标
//! - `action`: 决策输出（动作评分向量）
//! - `command`: 速度命令
//!
//! ## 设计约定
//!
//! 消息类型是纯数据：不携带到达时间戳，也不关心并发。时间戳由状态层
//! 在数据入库时盖章（参见 `strider-core`），这样同一个消息类型可以
//! 同时用于实时输入、测试注入和离线回放。

pub mod action;
pub mod command;
pub mod imu;
pub mod pose;
pub mod scan;

// 重新导出常用类型
pub use action::ActionVector;
pub use command::MotionCommand;
pub use imu::ImuSample;
pub use pose::{Goal, Pose2D};
pub use scan::RangeScan;
