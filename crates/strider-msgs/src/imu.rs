//! 惯性测量采样消息

use nalgebra::Vector3;

/// 一次惯性测量采样
///
/// 线加速度单位 m/s²，角速度单位 rad/s，均在机体坐标系下表示。
#[derive(Debug, Clone, PartialEq)]
pub struct ImuSample {
    /// 线加速度（m/s²）
    pub linear_acceleration: Vector3<f64>,
    /// 角速度（rad/s）
    pub angular_velocity: Vector3<f64>,
}

impl ImuSample {
    /// 创建新的采样
    pub fn new(linear_acceleration: Vector3<f64>, angular_velocity: Vector3<f64>) -> Self {
        Self {
            linear_acceleration,
            angular_velocity,
        }
    }

    /// 静止采样（两个向量均为零）
    pub fn zero() -> Self {
        Self {
            linear_acceleration: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }

    /// 线加速度模长（m/s²），可作为粗略的活动度指标
    pub fn accel_magnitude(&self) -> f64 {
        self.linear_acceleration.norm()
    }
}

impl Default for ImuSample {
    fn default() -> Self {
        Self::zero()
    }
}
