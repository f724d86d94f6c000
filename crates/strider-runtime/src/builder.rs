//! Builder 模式实现
//!
//! 链式配置并启动 [`Runtime`]：校验配置、执行组件启动、创建共享
//! 状态，然后把三个周期任务分别放到命名线程上。

use crate::control::ControlCycle;
use crate::cycle::run_cycle;
use crate::error::RuntimeError;
use crate::inference::InferenceCycle;
use crate::metrics::RuntimeMetrics;
use crate::planner::MotionPlanner;
use crate::policy::DecisionPolicy;
use crate::runtime::Runtime;
use crate::sink::{CommandSink, StatusSink};
use crate::status::StatusCycle;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::thread::JoinHandle;
use strider_core::{FreshnessPolicy, RobotContext, RuntimeConfig, SafetyGate, SystemMode};
use tracing::{error, info};

/// Runtime Builder（链式构造）
///
/// # Example
///
/// ```rust,no_run
/// use strider_runtime::{RuntimeBuilder, sink};
/// # use strider_runtime::{DecisionPolicy, MotionPlanner};
/// # use strider_core::{SensorSnapshot, Decision};
/// # use strider_msgs::{ActionVector, Goal, MotionCommand};
/// # struct P;
/// # impl DecisionPolicy for P {
/// #     type Error = std::io::Error;
/// #     fn decide(&mut self, _: &SensorSnapshot) -> Result<ActionVector, Self::Error> {
/// #         Ok(ActionVector::default())
/// #     }
/// # }
/// # struct M;
/// # impl MotionPlanner for M {
/// #     type Error = std::io::Error;
/// #     fn plan(&mut self, _: &SensorSnapshot, _: Option<&Decision>, _: Option<&Goal>)
/// #         -> Result<MotionCommand, Self::Error> {
/// #         Ok(MotionCommand::STOP)
/// #     }
/// # }
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (command_sink, _commands) = sink::command_mailbox();
/// let (status_sink, _status) = sink::status_channel(16);
///
/// let runtime = RuntimeBuilder::new()
///     .control_rate_hz(50.0)
///     .max_velocity(0.8)
///     .spawn(P, M, command_sink, status_sink)?;
/// # Ok(())
/// # }
/// ```
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    /// 以默认配置创建 Builder
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
        }
    }

    /// 整体替换配置
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置推理周期频率（Hz）
    pub fn inference_rate_hz(mut self, rate: f64) -> Self {
        self.config.inference_rate_hz = rate;
        self
    }

    /// 设置控制周期频率（Hz）
    pub fn control_rate_hz(mut self, rate: f64) -> Self {
        self.config.control_rate_hz = rate;
        self
    }

    /// 设置状态上报频率（Hz）
    pub fn status_rate_hz(mut self, rate: f64) -> Self {
        self.config.status_rate_hz = rate;
        self
    }

    /// 设置障碍接近保护距离（米）
    pub fn safety_distance(mut self, distance: f64) -> Self {
        self.config.safety_distance = distance;
        self
    }

    /// 设置线速度上限（m/s）
    pub fn max_velocity(mut self, velocity: f64) -> Self {
        self.config.max_velocity = velocity;
        self
    }

    /// 设置传感器最大容忍年龄（秒）
    pub fn sensor_max_age_s(mut self, seconds: f64) -> Self {
        self.config.sensor_max_age_s = Some(seconds);
        self
    }

    /// 校验配置、执行组件启动并拉起三个周期线程
    ///
    /// # 启动语义
    ///
    /// `policy.initialize()` / `planner.initialize()` 任一失败不会让
    /// spawn 返回错误：运行时照常启动，但模式永久停留在
    /// Initializing——控制周期持续发布零运动命令，状态周期持续发布
    /// 诚实的未就绪状态。只有配置非法或线程创建失败才返回 `Err`。
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Config`]: 配置校验失败
    /// - [`RuntimeError::Spawn`]: 周期线程创建失败
    pub fn spawn<P, M, C, S>(
        self,
        mut policy: P,
        mut planner: M,
        command_sink: C,
        status_sink: S,
    ) -> Result<Runtime, RuntimeError>
    where
        P: DecisionPolicy + Send + 'static,
        M: MotionPlanner + Send + 'static,
        C: CommandSink + 'static,
        S: StatusSink + 'static,
    {
        let config = self.config;
        config.validate()?;

        let ctx = Arc::new(RobotContext::new());
        let metrics = Arc::new(RuntimeMetrics::new());
        let is_running = Arc::new(AtomicBool::new(true));

        // === 组件启动 ===
        let mut ready = true;
        if let Err(err) = policy.initialize() {
            error!(error = %err, "decision policy bring-up failed; runtime will stay in Initializing");
            ready = false;
        }
        if let Err(err) = planner.initialize() {
            error!(error = %err, "motion planner bring-up failed; runtime will stay in Initializing");
            ready = false;
        }
        if ready {
            ctx.set_mode(SystemMode::Operational);
            info!(
                inference_rate_hz = config.inference_rate_hz,
                control_rate_hz = config.control_rate_hz,
                "component bring-up complete"
            );
        }

        // === 周期任务 ===
        let mut inference = InferenceCycle::new(
            ctx.clone(),
            policy,
            FreshnessPolicy::for_inference(config.sensor_max_age()),
            metrics.clone(),
        );
        let mut control = ControlCycle::new(
            ctx.clone(),
            planner,
            command_sink,
            SafetyGate::from_config(&config),
            ready,
            metrics.clone(),
        );
        let mut status = StatusCycle::new(ctx.clone(), status_sink, metrics.clone());

        // === 线程 ===
        let inference_thread = {
            let running = is_running.clone();
            let metrics = metrics.clone();
            let period = config.inference_period();
            let max_dt = period.mul_f64(config.dt_clamp_multiplier);
            spawn_thread("strider-inference", move || {
                run_cycle("inference", period, max_dt, &running, &metrics, move || {
                    inference.tick()
                });
            })?
        };

        let control_thread = {
            let running = is_running.clone();
            let metrics = metrics.clone();
            let period = config.control_period();
            let max_dt = period.mul_f64(config.dt_clamp_multiplier);
            let spawned = spawn_thread("strider-control", move || {
                // 设置线程优先级（可选 feature）
                #[cfg(feature = "realtime")]
                {
                    use thread_priority::*;
                    match set_current_thread_priority(ThreadPriority::Max) {
                        Ok(_) => {
                            info!("control thread priority set to MAX (realtime)");
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Failed to set control thread priority: {:?}. \
                                On Linux, you may need to run with CAP_SYS_NICE or use rtkit.",
                                e
                            );
                        }
                    }
                }

                run_cycle("control", period, max_dt, &running, &metrics, move || {
                    control.tick()
                });
            });
            match spawned {
                Ok(handle) => handle,
                Err(err) => {
                    is_running.store(false, Ordering::Release);
                    let _ = inference_thread.join();
                    return Err(err);
                }
            }
        };

        let status_thread = {
            let running = is_running.clone();
            let metrics = metrics.clone();
            let period = config.status_period();
            let max_dt = period.mul_f64(config.dt_clamp_multiplier);
            let spawned = spawn_thread("strider-status", move || {
                run_cycle("status", period, max_dt, &running, &metrics, move || {
                    status.tick()
                });
            });
            match spawned {
                Ok(handle) => handle,
                Err(err) => {
                    is_running.store(false, Ordering::Release);
                    let _ = inference_thread.join();
                    let _ = control_thread.join();
                    return Err(err);
                }
            }
        };

        Ok(Runtime {
            ctx,
            metrics,
            is_running,
            inference_thread: Some(inference_thread),
            control_thread: Some(control_thread),
            status_thread: Some(status_thread),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_thread<F>(name: &'static str, f: F) -> Result<JoinHandle<()>, RuntimeError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|source| RuntimeError::Spawn { name, source })
}
