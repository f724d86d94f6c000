//! 速度命令消息

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 差速底盘速度命令
///
/// 离开安全层的命令总是完整的：两个分量要么都来自规划结果，
/// 要么整体是 [`MotionCommand::STOP`]，不存在只填一半的情况。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionCommand {
    /// 前向线速度（m/s），前进为正
    pub linear: f64,
    /// 角速度（rad/s），逆时针为正
    pub angular: f64,
}

impl MotionCommand {
    /// 零运动命令（全系统通用的安全回退值）
    pub const STOP: MotionCommand = MotionCommand {
        linear: 0.0,
        angular: 0.0,
    };

    /// 创建新的命令
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// 是否为零运动命令
    pub fn is_stop(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linear={:.3} angular={:.3}", self.linear, self.angular)
    }
}
