//! 集成测试共享的桩组件
//!
//! 决策方和规划方在这里都是可脚本化的桩：固定输出、可随时切换
//! 失败、记录被调用时看到的输入，便于验证调度层的语义而不依赖
//! 任何真实算法。

#![allow(dead_code)]

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use strider_core::{Decision, SensorSnapshot};
use strider_msgs::{ActionVector, Goal, ImuSample, MotionCommand, RangeScan};
use strider_runtime::{DecisionPolicy, MotionPlanner};

/// 桩错误
#[derive(Debug)]
pub struct StubError(pub &'static str);

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for StubError {}

/// 固定评分的桩策略（可切换失败）
pub struct FixedPolicy {
    pub scores: Vec<f32>,
    pub fail: Arc<AtomicBool>,
    pub fail_init: bool,
    pub calls: Arc<AtomicU64>,
}

impl FixedPolicy {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            fail: Arc::new(AtomicBool::new(false)),
            fail_init: false,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 启动即失败的变体（模拟模型加载失败）
    pub fn broken_at_init(mut self) -> Self {
        self.fail_init = true;
        self
    }
}

impl DecisionPolicy for FixedPolicy {
    type Error = StubError;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            Err(StubError("model load failed"))
        } else {
            Ok(())
        }
    }

    fn decide(&mut self, _snapshot: &SensorSnapshot) -> Result<ActionVector, Self::Error> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail.load(Ordering::Relaxed) {
            Err(StubError("inference failed"))
        } else {
            Ok(ActionVector::new(self.scores.clone()))
        }
    }
}

/// 固定输出的桩规划器，记录看到的决策和目标
pub struct ScriptedPlanner {
    pub command: Arc<Mutex<MotionCommand>>,
    pub fail: Arc<AtomicBool>,
    pub calls: Arc<AtomicU64>,
    pub last_decision_scores: Arc<Mutex<Option<Vec<f32>>>>,
    pub last_goal: Arc<Mutex<Option<Goal>>>,
}

impl ScriptedPlanner {
    pub fn new(command: MotionCommand) -> Self {
        Self {
            command: Arc::new(Mutex::new(command)),
            fail: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicU64::new(0)),
            last_decision_scores: Arc::new(Mutex::new(None)),
            last_goal: Arc::new(Mutex::new(None)),
        }
    }
}

impl MotionPlanner for ScriptedPlanner {
    type Error = StubError;

    fn plan(
        &mut self,
        _snapshot: &SensorSnapshot,
        decision: Option<&Decision>,
        goal: Option<&Goal>,
    ) -> Result<MotionCommand, Self::Error> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_decision_scores.lock() = decision.map(|d| d.action.scores.clone());
        *self.last_goal.lock() = goal.copied();
        if self.fail.load(Ordering::Relaxed) {
            Err(StubError("planner failed"))
        } else {
            Ok(*self.command.lock())
        }
    }
}

/// 最近障碍为 `min` 米的扫描帧
pub fn scan_with_min(min: f32) -> RangeScan {
    RangeScan {
        angle_min: -1.57,
        angle_increment: 0.1,
        range_min: 0.05,
        range_max: 10.0,
        ranges: vec![min + 2.0, min, min + 1.0],
    }
}

/// 静止惯性采样
pub fn imu() -> ImuSample {
    ImuSample::zero()
}
