//! 内置仿真数据源
//!
//! 一个刻意简单的世界：机器人位于开阔平面上，前方 `wall_x` 处有
//! 一面无限长的墙。仿真线程以固定频率推送激光/惯性/位姿数据，并
//! 消费运行时发出的速度命令来推进机器人位姿，让整个感知-决策-执
//! 行环在没有硬件的情况下闭合。
//!
//! 同时提供两个演示用的外部组件：固定偏好的决策桩 [`SimPolicy`]
//! 和朝目标直线行驶的规划器 [`SeekPlanner`]。两者只服务于演示和
//! 联调，不代表任何真实算法。

use crossbeam_channel::Receiver;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{PI, TAU};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use strider_core::{Decision, SensorSnapshot};
use strider_msgs::{ActionVector, Goal, ImuSample, MotionCommand, Pose2D, RangeScan};
use strider_runtime::{DecisionPolicy, MotionPlanner, SensorFeed};
use tracing::info;

/// 仿真世界
pub struct SimWorld {
    pose: Pose2D,
    wall_x: f64,
    rng: StdRng,
}

impl SimWorld {
    /// 创建世界，机器人在原点朝 +x，墙在 `wall_x` 处
    pub fn new(wall_x: f64) -> Self {
        Self {
            pose: Pose2D::default(),
            wall_x,
            rng: StdRng::seed_from_u64(42),
        }
    }

    /// 当前位姿
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// 按速度命令推进 `dt` 秒（一阶积分）
    pub fn step(&mut self, command: MotionCommand, dt: f64) {
        self.pose.theta += command.angular * dt;
        self.pose.x += command.linear * self.pose.theta.cos() * dt;
        self.pose.y += command.linear * self.pose.theta.sin() * dt;
    }

    /// 生成一帧 9 束扇形扫描
    ///
    /// 每束方向与墙平面求交；背向墙或近似平行的束返回窗口外的值
    /// （表示无回波）。
    pub fn scan(&mut self) -> RangeScan {
        const BEAMS: usize = 9;
        let angle_min = -0.8f32;
        let angle_increment = 0.2f32;
        let range_max = 10.0f32;

        let mut ranges = Vec::with_capacity(BEAMS);
        for i in 0..BEAMS {
            let beam = angle_min as f64 + i as f64 * angle_increment as f64;
            let dir = self.pose.theta + beam;
            let cos = dir.cos();
            let noise: f64 = self.rng.gen_range(-0.01..0.01);
            let r = if cos > 0.05 {
                ((self.wall_x - self.pose.x) / cos + noise).max(0.0)
            } else {
                // 无回波
                f64::INFINITY
            };
            ranges.push(r as f32);
        }

        RangeScan {
            angle_min,
            angle_increment,
            range_min: 0.05,
            range_max,
            ranges,
        }
    }

    /// 生成一次惯性采样（重力 + 当前命令的角速度 + 噪声）
    pub fn imu(&mut self, command: MotionCommand) -> ImuSample {
        let nx: f64 = self.rng.gen_range(-0.02..0.02);
        let ny: f64 = self.rng.gen_range(-0.02..0.02);
        ImuSample::new(
            Vector3::new(nx, ny, 9.81),
            Vector3::new(0.0, 0.0, command.angular),
        )
    }
}

/// 仿真主循环：50Hz 推送传感数据，消费最新命令推进世界
pub fn drive(feed: SensorFeed, commands: Receiver<MotionCommand>, stop: Arc<AtomicBool>) {
    const DT: f64 = 0.02;
    let mut world = SimWorld::new(5.0);
    let mut last_command = MotionCommand::STOP;

    while !stop.load(Ordering::Relaxed) {
        // 只保留最新命令（执行机构语义：最新值胜出）
        while let Ok(cmd) = commands.try_recv() {
            last_command = cmd;
        }

        world.step(last_command, DT);
        feed.push_scan(world.scan());
        feed.push_imu(world.imu(last_command));
        feed.push_pose(world.pose());

        thread::sleep(Duration::from_secs_f64(DT));
    }
}

/// 演示用决策桩
///
/// 前方净空时偏好前进，否则偏好转向。`model_path` 只在启动时检查
/// 存在性，用于演示启动失败时运行时的行为（停留在 Initializing，
/// 持续发布安全命令）。
pub struct SimPolicy {
    model_path: Option<String>,
}

impl SimPolicy {
    /// 创建决策桩
    pub fn new(model_path: Option<String>) -> Self {
        Self { model_path }
    }
}

impl DecisionPolicy for SimPolicy {
    type Error = std::io::Error;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        match &self.model_path {
            Some(path) if !std::path::Path::new(path).exists() => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("decision model not found: {path}"),
            )),
            Some(path) => {
                info!(path = %path, "decision model loaded");
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn decide(&mut self, snapshot: &SensorSnapshot) -> Result<ActionVector, Self::Error> {
        let clear_ahead = snapshot.min_range().map(|r| r > 1.0).unwrap_or(false);
        Ok(if clear_ahead {
            ActionVector::new(vec![0.8, 0.2, 0.1])
        } else {
            ActionVector::new(vec![0.1, 0.7, 0.2])
        })
    }
}

/// 演示用规划器：朝目标直线行驶
///
/// 有目标且有位姿时做简单的方位角伺服；没有目标时按决策偏好缓慢
/// 探索。输出不自行限幅——限幅和障碍保护由安全层统一负责。
pub struct SeekPlanner {
    cruise: f64,
    goal_tolerance: f64,
}

impl SeekPlanner {
    /// 创建规划器
    pub fn new() -> Self {
        Self {
            cruise: 0.4,
            goal_tolerance: 0.15,
        }
    }
}

impl Default for SeekPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPlanner for SeekPlanner {
    type Error = std::io::Error;

    fn plan(
        &mut self,
        snapshot: &SensorSnapshot,
        decision: Option<&Decision>,
        goal: Option<&Goal>,
    ) -> Result<MotionCommand, Self::Error> {
        let pose = snapshot.pose.as_ref().map(|p| p.value);

        if let (Some(goal), Some(pose)) = (goal, pose) {
            if pose.distance_to(&goal.pose) < self.goal_tolerance {
                return Ok(MotionCommand::STOP);
            }
            let heading_err = wrap_angle(pose.bearing_to(&goal.pose) - pose.theta);
            // 航向偏差大时先原地转向
            let linear = if heading_err.abs() < 0.5 { self.cruise } else { 0.0 };
            return Ok(MotionCommand::new(linear, 1.2 * heading_err.clamp(-1.0, 1.0)));
        }

        // 没有目标：按决策偏好探索
        let prefer_forward = decision
            .map(|d| d.action.argmax() == Some(0))
            .unwrap_or(false);
        Ok(if prefer_forward {
            MotionCommand::new(0.2, 0.0)
        } else {
            MotionCommand::new(0.0, 0.4)
        })
    }
}

/// 把角度归一化到 `[-π, π]`
fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}
