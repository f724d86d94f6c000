//! # Strider Runtime
//!
//! 多速率感知-决策-执行调度器
//!
//! 三个独立的周期任务（推理、控制、状态上报）各自运行在自己的线程
//! 上，只通过 `strider-core` 的共享状态交互：没有任何周期会等待另
//! 一个周期——数据缺失用跳过或回退处理，而不是阻塞。控制周期的每
//! 个 tick 都会发出恰好一条命令：要么是经过限幅和障碍保护的规划输
//! 出，要么是零运动命令。
//!
//! ## 模块
//!
//! - `policy` / `planner`: 外部决策与运动规划的接入 trait
//! - `sink`: 命令/状态的输出端（邮箱覆盖槽与有界通道两种实现）
//! - `inference` / `control` / `status`: 三个周期任务
//! - `runtime` / `builder`: 线程生命周期管理
//! - `metrics`: 原子计数器
//!
//! ## 快速上手
//!
//! ```rust,no_run
//! use strider_runtime::{RuntimeBuilder, sink};
//! # use strider_runtime::{DecisionPolicy, MotionPlanner};
//! # use strider_core::{RuntimeConfig, SensorSnapshot, Decision};
//! # use strider_msgs::{ActionVector, Goal, MotionCommand};
//! # struct MyPolicy;
//! # impl DecisionPolicy for MyPolicy {
//! #     type Error = std::io::Error;
//! #     fn decide(&mut self, _: &SensorSnapshot) -> Result<ActionVector, Self::Error> {
//! #         Ok(ActionVector::default())
//! #     }
//! # }
//! # struct MyPlanner;
//! # impl MotionPlanner for MyPlanner {
//! #     type Error = std::io::Error;
//! #     fn plan(&mut self, _: &SensorSnapshot, _: Option<&Decision>, _: Option<&Goal>)
//! #         -> Result<MotionCommand, Self::Error> {
//! #         Ok(MotionCommand::STOP)
//! #     }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (command_sink, commands) = sink::command_channel(16);
//! let (status_sink, status) = sink::status_channel(16);
//!
//! let runtime = RuntimeBuilder::new()
//!     .control_rate_hz(50.0)
//!     .spawn(MyPolicy, MyPlanner, command_sink, status_sink)?;
//!
//! let feed = runtime.feed();
//! // feed.push_scan(...) / feed.push_imu(...) / feed.set_goal(...)
//! // commands.recv() 消费速度命令
//! runtime.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod control;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod planner;
pub mod policy;
pub mod runtime;
pub mod sink;
pub mod status;

mod cycle;

// 重新导出常用类型
pub use builder::RuntimeBuilder;
pub use control::ControlCycle;
pub use error::RuntimeError;
pub use inference::InferenceCycle;
pub use metrics::{MetricsSnapshot, RuntimeMetrics};
pub use planner::MotionPlanner;
pub use policy::DecisionPolicy;
pub use runtime::{Runtime, SensorFeed};
pub use sink::{CommandSink, SinkError, StatusSink};
pub use status::{StatusCycle, StatusReport};
