//! 运行时性能指标模块
//!
//! 提供零开销的原子计数器，用于监控三个周期任务的健康状态。
//! 所有计数器都使用原子操作，可以在任何线程安全地读取，不会引入
//! 锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 运行时实时指标
///
/// # 使用示例
///
/// ```rust
/// use strider_runtime::RuntimeMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(RuntimeMetrics::default());
///
/// // 在周期线程中更新
/// metrics.control_ticks.fetch_add(1, Ordering::Relaxed);
///
/// // 在主线程中读取快照
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.control_ticks, 1);
/// ```
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    /// 推理周期运行的 tick 总数
    pub inference_ticks: AtomicU64,

    /// 推理周期跳过的 tick 数（启动未完成或数据不新鲜，正常现象）
    pub inference_skips: AtomicU64,

    /// 决策方调用失败次数
    pub inference_failures: AtomicU64,

    /// 控制周期运行的 tick 总数
    pub control_ticks: AtomicU64,

    /// 控制周期回退（发出零运动命令）的次数
    ///
    /// 启动阶段的回退是预期的；运行中持续增长说明传感链路或
    /// 规划方有问题。
    pub control_fallbacks: AtomicU64,

    /// 成功发出的命令总数
    pub commands_emitted: AtomicU64,

    /// 状态报告发出总数
    pub status_reports: AtomicU64,

    /// 输出端拒绝（满/断开）次数
    pub sink_errors: AtomicU64,

    /// 周期时间跳变次数（实际间隔超过 dt 钳位阈值）
    pub time_jumps: AtomicU64,
}

impl RuntimeMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取人类可读的指标快照
    ///
    /// 逐计数器原子读取；不同计数器之间可能有微小的时间差。
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inference_ticks: self.inference_ticks.load(Ordering::Relaxed),
            inference_skips: self.inference_skips.load(Ordering::Relaxed),
            inference_failures: self.inference_failures.load(Ordering::Relaxed),
            control_ticks: self.control_ticks.load(Ordering::Relaxed),
            control_fallbacks: self.control_fallbacks.load(Ordering::Relaxed),
            commands_emitted: self.commands_emitted.load(Ordering::Relaxed),
            status_reports: self.status_reports.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
            time_jumps: self.time_jumps.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器（用于测试）
    pub fn reset(&self) {
        self.inference_ticks.store(0, Ordering::Relaxed);
        self.inference_skips.store(0, Ordering::Relaxed);
        self.inference_failures.store(0, Ordering::Relaxed);
        self.control_ticks.store(0, Ordering::Relaxed);
        self.control_fallbacks.store(0, Ordering::Relaxed);
        self.commands_emitted.store(0, Ordering::Relaxed);
        self.status_reports.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.time_jumps.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变，用于读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// 推理 tick 总数
    pub inference_ticks: u64,
    /// 推理跳过数
    pub inference_skips: u64,
    /// 决策失败数
    pub inference_failures: u64,
    /// 控制 tick 总数
    pub control_ticks: u64,
    /// 控制回退数
    pub control_fallbacks: u64,
    /// 命令发出总数
    pub commands_emitted: u64,
    /// 状态报告总数
    pub status_reports: u64,
    /// 输出端错误数
    pub sink_errors: u64,
    /// 时间跳变数
    pub time_jumps: u64,
}
