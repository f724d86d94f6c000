//! 推理周期
//!
//! 固定频率驱动决策方：前置条件满足时拍一份状态快照交给
//! [`DecisionPolicy::decide`]，成功则原子替换决策槽。任何一步不
//! 满足都只是跳过本 tick——不输出、不报错、不影响下一个 tick。

use crate::metrics::RuntimeMetrics;
use crate::policy::DecisionPolicy;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;
use strider_core::{Decision, FreshnessPolicy, RobotContext, SystemMode};
use tracing::{debug, error, trace};

/// 推理周期任务
///
/// 由运行时在独立线程上以 `inference_rate_hz` 驱动；tick 之间严格
/// 串行。`tick_at` 显式注入时间，便于测试和回放（参见
/// [`RobotContext::snapshot_at`]）。
pub struct InferenceCycle<P: DecisionPolicy> {
    ctx: Arc<RobotContext>,
    policy: P,
    freshness: FreshnessPolicy,
    metrics: Arc<RuntimeMetrics>,
}

impl<P: DecisionPolicy> InferenceCycle<P> {
    /// 创建推理周期任务
    pub fn new(
        ctx: Arc<RobotContext>,
        policy: P,
        freshness: FreshnessPolicy,
        metrics: Arc<RuntimeMetrics>,
    ) -> Self {
        Self {
            ctx,
            policy,
            freshness,
            metrics,
        }
    }

    /// 执行一个 tick（以当前时刻）
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// 执行一个 tick（以指定时刻）
    pub fn tick_at(&mut self, now: Instant) {
        self.metrics.inference_ticks.fetch_add(1, Ordering::Relaxed);

        // 启动未完成时不产出决策
        if self.ctx.mode() == SystemMode::Initializing {
            self.metrics.inference_skips.fetch_add(1, Ordering::Relaxed);
            trace!("inference tick skipped: bring-up incomplete");
            return;
        }

        let snapshot = self.ctx.snapshot_at(now);
        if let Err(reason) = self.freshness.evaluate(&snapshot) {
            // 数据缺失/过期是预期情况，跳过本 tick 即可
            self.metrics.inference_skips.fetch_add(1, Ordering::Relaxed);
            debug!(%reason, "inference tick skipped");
            return;
        }

        match self.policy.decide(&snapshot) {
            Ok(action) => {
                self.ctx.store_decision(Decision {
                    action,
                    produced_at: now,
                    sources: snapshot.stamps(),
                });
            }
            Err(err) => {
                // 单次失败只影响本 tick：保留上一次的决策，下个 tick 重试
                self.metrics
                    .inference_failures
                    .fetch_add(1, Ordering::Relaxed);
                error!(error = %err, "decision policy failed; keeping previous decision");
            }
        }
    }
}
