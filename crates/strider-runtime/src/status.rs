//! 状态上报周期
//!
//! 低频（默认 1Hz）对外发布当前系统模式，纯观测性任务，对系统
//! 行为没有任何副作用。

use crate::metrics::RuntimeMetrics;
use crate::sink::StatusSink;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use strider_core::{RobotContext, SystemMode};
use tracing::{debug, warn};

/// 状态报告
///
/// `summary` 是给人看的一行状态描述；程序化消费方应当使用 `mode`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// 当前系统模式
    pub mode: SystemMode,
    /// 人类可读的状态概要
    pub summary: String,
}

impl StatusReport {
    /// 按模式生成报告
    pub fn for_mode(mode: SystemMode) -> Self {
        Self {
            mode,
            summary: format!("strider: {}", mode.summary()),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

/// 状态上报周期任务
pub struct StatusCycle<S: StatusSink> {
    ctx: Arc<RobotContext>,
    sink: S,
    metrics: Arc<RuntimeMetrics>,
}

impl<S: StatusSink> StatusCycle<S> {
    /// 创建状态上报任务
    pub fn new(ctx: Arc<RobotContext>, sink: S, metrics: Arc<RuntimeMetrics>) -> Self {
        Self { ctx, sink, metrics }
    }

    /// 执行一个 tick
    pub fn tick(&mut self) {
        let report = StatusReport::for_mode(self.ctx.mode());
        debug!(mode = %report.mode, "status report");

        match self.sink.publish(report) {
            Ok(()) => {
                self.metrics.status_reports.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.metrics.sink_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "status sink rejected report");
            }
        }
    }
}
