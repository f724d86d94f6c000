//! 周期驱动循环
//!
//! 三个周期任务共用的节拍器：tick -> 睡眠 -> 检查运行标志。
//! 同一周期的 tick 严格串行（单线程循环），不存在 tick 重叠，
//! 因此外部函数不会被并发调用，决策槽/命令输出也不会出现
//! 乱序的最后写入竞争。

use crate::metrics::RuntimeMetrics;
use spin_sleep::SpinSleeper;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// 以固定周期驱动 `tick`，直到运行标志被清除
///
/// - 每轮先检查 `is_running`（Acquire：看到 false 时也能看到其他
///   线程的清理写入），保证关停时正在执行的 tick 完整结束、之后
///   不再调度新的 tick
/// - 实际间隔超过 `max_dt` 时记一次时间跳变（系统卡顿、调度延迟），
///   只告警不补偿——周期任务按最新状态工作，不回放错过的 tick
/// - 使用 `spin_sleep` 获得低抖动的延时精度
pub(crate) fn run_cycle<F>(
    name: &'static str,
    period: Duration,
    max_dt: Duration,
    is_running: &Arc<AtomicBool>,
    metrics: &Arc<RuntimeMetrics>,
    mut tick: F,
) where
    F: FnMut(),
{
    let sleeper = SpinSleeper::default();
    let mut last_tick: Option<Instant> = None;

    while is_running.load(Ordering::Acquire) {
        let now = Instant::now();
        if let Some(last) = last_tick {
            let real_dt = now - last;
            if real_dt > max_dt {
                metrics.time_jumps.fetch_add(1, Ordering::Relaxed);
                warn!(
                    cycle = name,
                    real_dt_ms = real_dt.as_millis() as u64,
                    period_ms = period.as_millis() as u64,
                    "cycle fell behind schedule"
                );
            }
        }

        tick();

        last_tick = Some(now);
        sleeper.sleep(period);
    }

    trace!(cycle = name, "shutdown flag observed, exiting");
}
