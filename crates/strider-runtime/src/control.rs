//! 控制周期
//!
//! 独立于推理周期的固定频率任务：读取最新的决策（可能缺失或早于
//! 当前周期）、状态快照和目标，经安全门把关后发出恰好一条速度命
//! 令。两个周期的频率解耦是刻意的——决策（如学习策略）和底层运
//! 动控制有各自的自然更新率和开销，绑在同一个节拍上会迫使廉价且
//! 安全攸关的控制环跟着昂贵的决策环降速。
//!
//! # 输出不变式
//!
//! 每个 tick 离开本周期的命令要么是经过限幅和障碍接近保护的规划
//! 输出，要么是零运动命令，不存在第三种情况。系统模式每个 tick
//! 重新计算，不做跨 tick 缓存。

use crate::metrics::RuntimeMetrics;
use crate::planner::MotionPlanner;
use crate::sink::CommandSink;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;
use strider_core::{HoldReason, RobotContext, SafetyGate, SystemMode};
use strider_msgs::MotionCommand;
use tracing::{debug, error, warn};

/// 控制周期任务
///
/// 由运行时在独立线程上以 `control_rate_hz` 驱动；tick 之间严格
/// 串行。
pub struct ControlCycle<M: MotionPlanner, S: CommandSink> {
    ctx: Arc<RobotContext>,
    planner: M,
    sink: S,
    gate: SafetyGate,
    /// 组件启动是否成功；false 时永久走回退分支（模式保持 Initializing）
    ready: bool,
    metrics: Arc<RuntimeMetrics>,
}

impl<M: MotionPlanner, S: CommandSink> ControlCycle<M, S> {
    /// 创建控制周期任务
    pub fn new(
        ctx: Arc<RobotContext>,
        planner: M,
        sink: S,
        gate: SafetyGate,
        ready: bool,
        metrics: Arc<RuntimeMetrics>,
    ) -> Self {
        Self {
            ctx,
            planner,
            sink,
            gate,
            ready,
            metrics,
        }
    }

    /// 执行一个 tick（以当前时刻）
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// 执行一个 tick（以指定时刻）
    pub fn tick_at(&mut self, now: Instant) {
        self.metrics.control_ticks.fetch_add(1, Ordering::Relaxed);

        let snapshot = self.ctx.snapshot_at(now);
        let decision = self.ctx.latest_decision();
        let goal = self.ctx.goal();

        let command = if !self.ready {
            // 启动失败：模式停留在 Initializing，持续发布安全命令和诚实状态
            self.ctx.set_mode(SystemMode::Initializing);
            self.note_fallback(&HoldReason::NotReady);
            MotionCommand::STOP
        } else {
            match self.gate.preconditions(&snapshot) {
                Err(reason) => {
                    self.ctx.set_mode(SystemMode::Degraded);
                    self.note_fallback(&reason);
                    MotionCommand::STOP
                }
                Ok(()) => {
                    let goal_ref = goal.as_deref().map(|g| &g.value);
                    match self
                        .planner
                        .plan(&snapshot, decision.as_deref(), goal_ref)
                    {
                        Ok(proposed) => {
                            self.ctx.set_mode(SystemMode::Operational);
                            self.gate.apply(proposed, snapshot.min_range())
                        }
                        Err(err) => {
                            // 单次规划失败只影响本 tick
                            self.metrics
                                .control_fallbacks
                                .fetch_add(1, Ordering::Relaxed);
                            self.ctx.set_mode(SystemMode::Degraded);
                            self.ctx.record_hold(format_args!("planner failed: {err}"));
                            error!(error = %err, "motion planner failed; emitting stop command");
                            MotionCommand::STOP
                        }
                    }
                }
            }
        };

        self.ctx.record_command(command);
        match self.sink.publish(command) {
            Ok(()) => {
                self.metrics.commands_emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.metrics.sink_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "command sink rejected command");
            }
        }
    }

    fn note_fallback(&self, reason: &HoldReason) {
        self.metrics
            .control_fallbacks
            .fetch_add(1, Ordering::Relaxed);
        self.ctx.record_hold(reason);
        if reason.is_expected() {
            // 启动阶段数据尚未到齐：预期情况
            debug!(%reason, "control tick fell back to stop command");
        } else {
            warn!(%reason, "control tick fell back to stop command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::command_channel;
    use crossbeam_channel::Receiver;
    use std::fmt;
    use std::time::Duration;
    use strider_core::{FreshnessPolicy, SafetyLimits};
    use strider_msgs::{Goal, ImuSample, RangeScan};

    #[derive(Debug)]
    struct StubError;

    impl fmt::Display for StubError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub failure")
        }
    }

    impl std::error::Error for StubError {}

    /// 固定输出、可切换失败的测试规划器
    struct ScriptedPlanner {
        command: MotionCommand,
        fail: bool,
        calls: u32,
    }

    impl MotionPlanner for ScriptedPlanner {
        type Error = StubError;

        fn plan(
            &mut self,
            _snapshot: &strider_core::SensorSnapshot,
            _decision: Option<&strider_core::Decision>,
            _goal: Option<&Goal>,
        ) -> Result<MotionCommand, Self::Error> {
            self.calls += 1;
            if self.fail {
                Err(StubError)
            } else {
                Ok(self.command)
            }
        }
    }

    fn scan_with_min(min: f32) -> RangeScan {
        RangeScan {
            angle_min: 0.0,
            angle_increment: 0.1,
            range_min: 0.05,
            range_max: 10.0,
            ranges: vec![min, min + 1.0],
        }
    }

    fn gate() -> SafetyGate {
        SafetyGate::new(
            FreshnessPolicy::for_control(Duration::from_millis(200)),
            SafetyLimits {
                safety_distance: 0.5,
                max_velocity: 0.5,
                max_angular_velocity: 1.5,
            },
        )
    }

    fn cycle_with(
        ctx: Arc<RobotContext>,
        planner: ScriptedPlanner,
        ready: bool,
    ) -> (
        ControlCycle<ScriptedPlanner, crate::sink::ChannelCommandSink>,
        Receiver<MotionCommand>,
    ) {
        let (sink, rx) = command_channel(64);
        let cycle = ControlCycle::new(
            ctx,
            planner,
            sink,
            gate(),
            ready,
            Arc::new(RuntimeMetrics::new()),
        );
        (cycle, rx)
    }

    fn feed_fresh(ctx: &RobotContext, t0: Instant, min_range: f32) {
        ctx.push_scan_at(scan_with_min(min_range), t0);
        ctx.push_imu_at(ImuSample::zero(), t0);
    }

    #[test]
    fn test_no_data_emits_stop_without_calling_planner() {
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.4, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);

        cycle.tick_at(Instant::now());

        assert_eq!(rx.try_recv().unwrap(), MotionCommand::STOP);
        assert_eq!(ctx.mode(), SystemMode::Degraded);
        assert_eq!(cycle.planner.calls, 0);
    }

    #[test]
    fn test_fresh_data_emits_planned_command() {
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();
        feed_fresh(&ctx, t0, 3.0);

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.3, 0.2),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);
        cycle.tick_at(t0 + Duration::from_millis(10));

        assert_eq!(rx.try_recv().unwrap(), MotionCommand::new(0.3, 0.2));
        assert!(ctx.mode().is_operational());
    }

    #[test]
    fn test_proximity_floor_applies_to_planner_output() {
        // 障碍 0.2m < 0.5m，规划器坚持 0.5 前进：前向速度被压到 0
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();
        feed_fresh(&ctx, t0, 0.2);

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.5, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);
        cycle.tick_at(t0);

        let emitted = rx.try_recv().unwrap();
        assert!(emitted.linear <= 0.0);
        // 障碍保护是限幅不是失败：模式仍为 Operational
        assert!(ctx.mode().is_operational());
    }

    #[test]
    fn test_velocity_clamped_not_rejected() {
        // 规划器每次输出 0.8，上限 0.5：每条命令都是 0.5，一条不少
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.8, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);

        for i in 0..5 {
            let now = t0 + Duration::from_millis(i * 10);
            feed_fresh(&ctx, now, 3.0);
            cycle.tick_at(now);
        }

        let emitted: Vec<_> = rx.try_iter().collect();
        assert_eq!(emitted.len(), 5);
        for cmd in emitted {
            assert_eq!(cmd.linear, 0.5);
        }
    }

    #[test]
    fn test_stale_inertial_emits_stop() {
        // 惯性数据过期（快照时刻比入库晚 5 秒，容忍 0.2 秒）
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();
        ctx.push_imu_at(ImuSample::zero(), t0);
        let later = t0 + Duration::from_secs(5);
        ctx.push_scan_at(scan_with_min(3.0), later);

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.4, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);
        cycle.tick_at(later);

        assert_eq!(rx.try_recv().unwrap(), MotionCommand::STOP);
        assert_eq!(ctx.mode(), SystemMode::Degraded);
        assert_eq!(cycle.planner.calls, 0);
    }

    #[test]
    fn test_planner_failure_is_single_tick() {
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();
        feed_fresh(&ctx, t0, 3.0);

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.3, 0.0),
            fail: true,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);

        // tick N：规划失败 -> 零运动命令 + Degraded
        cycle.tick_at(t0);
        assert_eq!(rx.try_recv().unwrap(), MotionCommand::STOP);
        assert_eq!(ctx.mode(), SystemMode::Degraded);

        // tick N+1：规划恢复 -> 正常命令 + Operational（一个周期内恢复）
        cycle.planner.fail = false;
        feed_fresh(&ctx, t0 + Duration::from_millis(10), 3.0);
        cycle.tick_at(t0 + Duration::from_millis(10));
        assert_eq!(rx.try_recv().unwrap(), MotionCommand::new(0.3, 0.0));
        assert!(ctx.mode().is_operational());
    }

    #[test]
    fn test_not_ready_pins_initializing() {
        // 启动失败：数据再新鲜也只发零运动命令，模式保持 Initializing
        let ctx = Arc::new(RobotContext::new());
        let t0 = Instant::now();
        feed_fresh(&ctx, t0, 3.0);

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.4, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, false);

        for i in 0..3 {
            cycle.tick_at(t0 + Duration::from_millis(i * 10));
        }

        let emitted: Vec<_> = rx.try_iter().collect();
        assert_eq!(emitted.len(), 3);
        assert!(emitted.iter().all(|c| c.is_stop()));
        assert_eq!(ctx.mode(), SystemMode::Initializing);
        assert_eq!(cycle.planner.calls, 0);
    }

    #[test]
    fn test_one_command_per_tick() {
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let t0 = Instant::now();

        let planner = ScriptedPlanner {
            command: MotionCommand::new(0.2, 0.0),
            fail: false,
            calls: 0,
        };
        let (mut cycle, rx) = cycle_with(ctx.clone(), planner, true);

        // 数据缺失与数据新鲜交替：每个 tick 恰好一条命令
        cycle.tick_at(t0);
        feed_fresh(&ctx, t0, 3.0);
        cycle.tick_at(t0);
        cycle.tick_at(t0);

        assert_eq!(rx.try_iter().count(), 3);
        assert_eq!(cycle.metrics.snapshot().commands_emitted, 3);
    }

    #[test]
    fn test_diagnostics_updated_on_fallback() {
        let ctx = Arc::new(RobotContext::new());
        ctx.set_mode(SystemMode::Operational);
        let planner = ScriptedPlanner {
            command: MotionCommand::STOP,
            fail: false,
            calls: 0,
        };
        let (mut cycle, _rx) = cycle_with(ctx.clone(), planner, true);
        cycle.tick_at(Instant::now());

        let diag = ctx.diagnostics();
        assert_eq!(diag.holds_total, 1);
        assert!(diag.last_hold.unwrap().contains("range"));
        assert_eq!(diag.last_command, Some(MotionCommand::STOP));
    }
}
