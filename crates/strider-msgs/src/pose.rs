//! 平面位姿与导航目标

use nalgebra::{Point2, Vector2};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 平面位姿（x, y, 朝向角）
///
/// 差速底盘的工作平面是二维的，里程计和目标都用这个类型表示。
/// `theta` 为弧度，逆时针为正，不要求落在 `[-π, π)`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose2D {
    /// x 坐标（米）
    pub x: f64,
    /// y 坐标（米）
    pub y: f64,
    /// 朝向角（弧度）
    pub theta: f64,
}

impl Pose2D {
    /// 创建新的位姿
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// 位置分量
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// 到另一位姿的平面距离（米）
    pub fn distance_to(&self, other: &Pose2D) -> f64 {
        (other.position() - self.position()).norm()
    }

    /// 指向另一位姿的方位角（弧度，世界坐标系）
    pub fn bearing_to(&self, other: &Pose2D) -> f64 {
        let d: Vector2<f64> = other.position() - self.position();
        d.y.atan2(d.x)
    }
}

impl fmt::Display for Pose2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, θ={:.3})", self.x, self.y, self.theta)
    }
}

/// 导航目标
///
/// 系统中同一时刻只有一个活动目标，新目标整体覆盖旧目标
/// （last-writer-wins），可达性判断由运动规划方负责。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Goal {
    /// 目标位姿
    pub pose: Pose2D,
}

impl Goal {
    /// 从位姿创建目标
    pub fn new(pose: Pose2D) -> Self {
        Self { pose }
    }
}

impl From<Pose2D> for Goal {
    fn from(pose: Pose2D) -> Self {
        Self { pose }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "goal {}", self.pose)
    }
}
