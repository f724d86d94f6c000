//! 运行时生命周期管理
//!
//! [`Runtime`] 持有三个周期线程的句柄和共享状态；唯一的取消方式
//! 是整体关停：清除运行标志，让每个周期完成正在执行的 tick 后不
//! 再调度新的 tick，然后逐一 join。没有任何 tick 会在写共享状态
//! 的中途被打断。

use crate::metrics::{MetricsSnapshot, RuntimeMetrics};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use strider_core::{Diagnostics, RobotContext, SystemMode};
use strider_msgs::{Goal, ImuSample, Pose2D, RangeScan};
use tracing::{info, warn};

/// 运行中的调度器
///
/// 由 [`RuntimeBuilder::spawn`](crate::RuntimeBuilder::spawn) 创建。
/// Drop 时自动关停（等价于 [`Runtime::shutdown`]）。
pub struct Runtime {
    pub(crate) ctx: Arc<RobotContext>,
    pub(crate) metrics: Arc<RuntimeMetrics>,
    pub(crate) is_running: Arc<AtomicBool>,
    pub(crate) inference_thread: Option<JoinHandle<()>>,
    pub(crate) control_thread: Option<JoinHandle<()>>,
    pub(crate) status_thread: Option<JoinHandle<()>>,
}

impl Runtime {
    /// 传感器生产者句柄（可克隆，分发给各数据源）
    pub fn feed(&self) -> SensorFeed {
        SensorFeed {
            ctx: self.ctx.clone(),
        }
    }

    /// 共享状态上下文
    ///
    /// 测试和高级用法使用；常规生产者应当通过 [`Runtime::feed`]。
    pub fn context(&self) -> Arc<RobotContext> {
        self.ctx.clone()
    }

    /// 当前系统模式
    pub fn mode(&self) -> SystemMode {
        self.ctx.mode()
    }

    /// 指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 诊断记录副本
    pub fn diagnostics(&self) -> Diagnostics {
        self.ctx.diagnostics()
    }

    /// 检查周期线程是否都还活着
    pub fn is_healthy(&self) -> bool {
        let alive = |handle: &Option<JoinHandle<()>>| {
            handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
        };
        alive(&self.inference_thread) && alive(&self.control_thread) && alive(&self.status_thread)
    }

    /// 优雅关停
    ///
    /// 清除运行标志并等待三个周期线程退出。正在执行的 tick 会完整
    /// 结束；之后不再有新的 tick。
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        // Release: 周期线程以 Acquire 读到 false 时能看到这里之前的全部写入
        self.is_running.store(false, Ordering::Release);

        for (name, handle) in [
            ("inference", self.inference_thread.take()),
            ("control", self.control_thread.take()),
            ("status", self.status_thread.take()),
        ] {
            if let Some(handle) = handle
                && handle.join().is_err()
            {
                warn!(cycle = name, "cycle thread panicked before shutdown");
            }
        }

        info!("runtime stopped");
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// 传感器生产者句柄
///
/// 每个异步数据源持有一个克隆，按自己的节奏推送数据；推送从不
/// 阻塞在读者上。不同句柄写同一通道时按到达顺序生效，最后写入者
/// 胜出。
#[derive(Clone)]
pub struct SensorFeed {
    ctx: Arc<RobotContext>,
}

impl SensorFeed {
    /// 推送一帧激光扫描
    pub fn push_scan(&self, scan: RangeScan) {
        self.ctx.push_scan(scan);
    }

    /// 推送一次惯性采样
    pub fn push_imu(&self, sample: ImuSample) {
        self.ctx.push_imu(sample);
    }

    /// 推送一次位姿
    pub fn push_pose(&self, pose: Pose2D) {
        self.ctx.push_pose(pose);
    }

    /// 设置导航目标（覆盖旧目标）
    pub fn set_goal(&self, goal: Goal) {
        self.ctx.set_goal(goal);
    }

    /// 清除当前目标
    pub fn clear_goal(&self) {
        self.ctx.clear_goal();
    }
}
