//! 数据新鲜度判定
//!
//! 纯函数逻辑：给定一个快照和一组必需通道，判断数据是否新鲜到可以
//! 据此行动。从未收到的通道无论容忍多大的年龄都视为过期。

use crate::state::{Channel, SensorSnapshot};
use std::fmt;
use std::time::Duration;

/// 回退原因
///
/// 周期任务放弃正常输出（跳过或回退到零运动命令）的原因。区分
/// "从未收到"和"收到过但过期"两种情况：前者是启动阶段的正常现象，
/// 按 debug 级别记录；后者说明数据链路出了问题，按 warn 级别记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldReason {
    /// 组件启动未完成（或启动失败）
    NotReady,
    /// 必需通道从未收到数据
    MissingChannel(Channel),
    /// 必需通道数据已过期
    StaleChannel {
        /// 过期的通道
        channel: Channel,
        /// 实际年龄
        age: Duration,
    },
}

impl HoldReason {
    /// 是否属于启动阶段的预期情况（决定日志级别）
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotReady | Self::MissingChannel(_))
    }
}

impl fmt::Display for HoldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "component bring-up incomplete"),
            Self::MissingChannel(channel) => {
                write!(f, "{channel} channel has never been updated")
            }
            Self::StaleChannel { channel, age } => {
                write!(f, "{channel} channel is stale (age {:.3}s)", age.as_secs_f64())
            }
        }
    }
}

/// 新鲜度策略
///
/// 每种周期任务有自己的必需通道集合和最大容忍年龄：
/// - 推理周期需要扫描 + 惯性数据（[`FreshnessPolicy::for_inference`]）
/// - 控制周期同样需要扫描 + 惯性数据（[`FreshnessPolicy::for_control`]），
///   位姿不是硬性要求——规划方在缺位姿时可以自行退化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// 最大容忍年龄
    pub max_age: Duration,
    /// 是否要求扫描通道
    pub require_scan: bool,
    /// 是否要求惯性通道
    pub require_imu: bool,
    /// 是否要求位姿通道
    pub require_pose: bool,
}

impl FreshnessPolicy {
    /// 推理周期的必需通道集合：扫描 + 惯性
    pub fn for_inference(max_age: Duration) -> Self {
        Self {
            max_age,
            require_scan: true,
            require_imu: true,
            require_pose: false,
        }
    }

    /// 控制周期的必需通道集合：扫描 + 惯性
    pub fn for_control(max_age: Duration) -> Self {
        Self {
            max_age,
            require_scan: true,
            require_imu: true,
            require_pose: false,
        }
    }

    /// 额外要求位姿通道
    pub fn with_pose(mut self) -> Self {
        self.require_pose = true;
        self
    }

    /// 判定快照是否满足本策略
    ///
    /// 返回第一个不满足的通道。检查顺序固定为扫描、惯性、位姿，
    /// 便于日志输出稳定。
    pub fn evaluate(&self, snapshot: &SensorSnapshot) -> Result<(), HoldReason> {
        for (required, channel) in [
            (self.require_scan, Channel::Range),
            (self.require_imu, Channel::Inertial),
            (self.require_pose, Channel::Pose),
        ] {
            if !required {
                continue;
            }
            match snapshot.age_of(channel) {
                None => return Err(HoldReason::MissingChannel(channel)),
                Some(age) if age > self.max_age => {
                    return Err(HoldReason::StaleChannel { channel, age });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// `evaluate` 的布尔版本
    pub fn is_fresh(&self, snapshot: &SensorSnapshot) -> bool {
        self.evaluate(snapshot).is_ok()
    }
}
