//! 速度限幅与障碍接近保护
//!
//! 安全门不是独立线程，而是控制周期每个 tick 咨询的纯函数逻辑，
//! 分两步使用：`preconditions` 判定本 tick 能否采用规划输出，
//! `apply` 对采用的命令做限幅和障碍接近保护。后者是外部规划算法
//! 之下的硬性下限，即使规划方有缺陷或被篡改也必须生效。

use crate::config::RuntimeConfig;
use crate::freshness::{FreshnessPolicy, HoldReason};
use crate::state::SensorSnapshot;
use strider_msgs::MotionCommand;

/// 安全限制参数
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyLimits {
    /// 障碍接近保护距离（米）：最近障碍低于此距离时禁止前向速度
    pub safety_distance: f64,
    /// 线速度模长上限（m/s）
    pub max_velocity: f64,
    /// 角速度模长上限（rad/s）
    pub max_angular_velocity: f64,
}

/// 安全门
///
/// 由控制周期持有并在每个 tick 咨询。两个入口都不修改任何状态。
#[derive(Debug, Clone)]
pub struct SafetyGate {
    freshness: FreshnessPolicy,
    limits: SafetyLimits,
}

impl SafetyGate {
    /// 创建安全门
    pub fn new(freshness: FreshnessPolicy, limits: SafetyLimits) -> Self {
        Self { freshness, limits }
    }

    /// 按运行时配置创建（控制周期的默认必需通道集合）
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            FreshnessPolicy::for_control(config.sensor_max_age()),
            SafetyLimits {
                safety_distance: config.safety_distance,
                max_velocity: config.max_velocity,
                max_angular_velocity: config.max_angular_velocity,
            },
        )
    }

    /// 当前限制参数
    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// 判定本 tick 的前置条件
    ///
    /// 只做数据层面的检查（必需通道存在且新鲜）；模式层面的检查
    /// （启动是否完成）由调用方负责。
    pub fn preconditions(&self, snapshot: &SensorSnapshot) -> Result<(), HoldReason> {
        self.freshness.evaluate(snapshot)
    }

    /// 对规划输出做限幅和障碍接近保护
    ///
    /// - 线速度/角速度按模长钳位到配置上限（钳位而不是拒绝，
    ///   避免命令断流）
    /// - 最近障碍距离低于保护距离时，前向线速度强制归零，后退不受
    ///   影响
    /// - 非有限分量替换为零：外部算法的任何输出都不能穿透这一层
    pub fn apply(&self, proposed: MotionCommand, min_range: Option<f32>) -> MotionCommand {
        let mut linear = if proposed.linear.is_finite() {
            proposed
                .linear
                .clamp(-self.limits.max_velocity, self.limits.max_velocity)
        } else {
            0.0
        };
        let angular = if proposed.angular.is_finite() {
            proposed.angular.clamp(
                -self.limits.max_angular_velocity,
                self.limits.max_angular_velocity,
            )
        } else {
            0.0
        };

        if let Some(range) = min_range
            && (range as f64) < self.limits.safety_distance
        {
            linear = linear.min(0.0);
        }

        MotionCommand { linear, angular }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

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

    #[test]
    fn test_linear_clamp() {
        // 规划输出 0.8，上限 0.5：钳位而不是拒绝
        let out = gate().apply(MotionCommand::new(0.8, 0.0), Some(3.0));
        assert_eq!(out.linear, 0.5);

        let out = gate().apply(MotionCommand::new(-0.9, 0.0), Some(3.0));
        assert_eq!(out.linear, -0.5);
    }

    #[test]
    fn test_angular_clamp() {
        let out = gate().apply(MotionCommand::new(0.0, 4.0), Some(3.0));
        assert_eq!(out.angular, 1.5);

        let out = gate().apply(MotionCommand::new(0.0, -4.0), Some(3.0));
        assert_eq!(out.angular, -1.5);
    }

    #[test]
    fn test_proximity_floor_zeroes_forward_velocity() {
        // 最近障碍 0.2 米 < 保护距离 0.5 米：前向速度归零
        let out = gate().apply(MotionCommand::new(0.5, 0.3), Some(0.2));
        assert_eq!(out.linear, 0.0);
        // 角速度不受障碍保护影响
        assert_eq!(out.angular, 0.3);
    }

    #[test]
    fn test_proximity_floor_allows_reverse() {
        // 后退远离障碍是允许的
        let out = gate().apply(MotionCommand::new(-0.3, 0.0), Some(0.2));
        assert_eq!(out.linear, -0.3);
    }

    #[test]
    fn test_proximity_floor_inactive_without_range() {
        // 没有有效障碍距离时不触发保护（新鲜度检查在 preconditions 里把关）
        let out = gate().apply(MotionCommand::new(0.4, 0.0), None);
        assert_eq!(out.linear, 0.4);
    }

    #[test]
    fn test_proximity_boundary() {
        // 恰好等于保护距离不触发
        let out = gate().apply(MotionCommand::new(0.4, 0.0), Some(0.5));
        assert_eq!(out.linear, 0.4);
    }

    #[test]
    fn test_non_finite_components_become_zero() {
        let out = gate().apply(MotionCommand::new(f64::NAN, f64::INFINITY), Some(3.0));
        assert_eq!(out, MotionCommand::STOP);
    }

    #[test]
    fn test_clamp_composes_with_proximity_floor() {
        // 先钳位后保护：超速 + 障碍过近 => 前向归零
        let out = gate().apply(MotionCommand::new(2.0, 0.0), Some(0.1));
        assert_eq!(out.linear, 0.0);
    }

    #[test]
    fn test_from_config_uses_limits() {
        let config = RuntimeConfig::default();
        let gate = SafetyGate::from_config(&config);
        assert_eq!(gate.limits().safety_distance, 0.5);
        assert_eq!(gate.limits().max_velocity, 0.5);
    }
}
