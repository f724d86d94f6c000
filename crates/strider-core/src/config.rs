//! 运行时配置
//!
//! 三个周期任务的频率、安全限制和决策模型路径。支持从 TOML 文件
//! 加载，所有字段都有默认值，缺省字段按默认值填充。

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 默认的传感器容忍年龄系数（相对控制周期）
///
/// 未显式配置 `sensor_max_age_s` 时，容忍年龄取控制周期的若干倍：
/// 单个周期的容忍度会让正常抖动频繁触发降级，系数过大又会让过期
/// 数据驱动底盘。
const SENSOR_MAX_AGE_PERIODS: f64 = 3.0;

/// 运行时配置
///
/// # Example
///
/// ```
/// use strider_core::RuntimeConfig;
///
/// let config = RuntimeConfig {
///     control_rate_hz: 50.0,
///     ..Default::default()
/// };
/// config.validate().unwrap();
/// assert_eq!(config.control_period().as_millis(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// 推理周期频率（Hz）
    pub inference_rate_hz: f64,
    /// 控制周期频率（Hz）
    pub control_rate_hz: f64,
    /// 状态上报频率（Hz）
    pub status_rate_hz: f64,
    /// 障碍接近保护距离（米）
    pub safety_distance: f64,
    /// 线速度模长上限（m/s）
    pub max_velocity: f64,
    /// 角速度模长上限（rad/s）
    pub max_angular_velocity: f64,
    /// 传感器最大容忍年龄（秒）
    ///
    /// `None` 时按控制周期推导（见 [`RuntimeConfig::sensor_max_age`]）。
    pub sensor_max_age_s: Option<f64>,
    /// dt 钳位倍数
    ///
    /// 周期任务实际间隔超过标称周期的此倍数时记一次时间跳变。
    pub dt_clamp_multiplier: f64,
    /// 决策模型路径（原样传给决策方的加载逻辑，本层不解释）
    pub decision_model_path: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inference_rate_hz: 10.0,
            control_rate_hz: 15.0,
            status_rate_hz: 1.0,
            safety_distance: 0.5,
            max_velocity: 0.5,
            max_angular_velocity: 1.5,
            sensor_max_age_s: None,
            dt_clamp_multiplier: 2.0,
            decision_model_path: None,
        }
    }
}

impl RuntimeConfig {
    /// 校验配置
    ///
    /// 拒绝非正的频率/限幅/倍数；过高的频率只告警不拒绝。
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("inference_rate_hz", self.inference_rate_hz),
            ("control_rate_hz", self.control_rate_hz),
            ("status_rate_hz", self.status_rate_hz),
            ("max_velocity", self.max_velocity),
            ("max_angular_velocity", self.max_angular_velocity),
            ("dt_clamp_multiplier", self.dt_clamp_multiplier),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }

        if !(self.safety_distance >= 0.0) || !self.safety_distance.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "safety_distance",
                value: self.safety_distance,
            });
        }

        if let Some(max_age) = self.sensor_max_age_s
            && (!(max_age > 0.0) || !max_age.is_finite())
        {
            return Err(ConfigError::InvalidValue {
                name: "sensor_max_age_s",
                value: max_age,
            });
        }

        if self.control_rate_hz > 1000.0 || self.inference_rate_hz > 1000.0 {
            tracing::warn!(
                control_rate_hz = self.control_rate_hz,
                inference_rate_hz = self.inference_rate_hz,
                "very high cycle rate; this may cause scheduling jitter"
            );
        }

        Ok(())
    }

    /// 传感器最大容忍年龄
    ///
    /// 显式配置优先；否则取控制周期 × 系数。
    pub fn sensor_max_age(&self) -> Duration {
        let seconds = self
            .sensor_max_age_s
            .unwrap_or(SENSOR_MAX_AGE_PERIODS / self.control_rate_hz);
        Duration::from_secs_f64(seconds)
    }

    /// 推理周期长度
    pub fn inference_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.inference_rate_hz)
    }

    /// 控制周期长度
    pub fn control_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.control_rate_hz)
    }

    /// 状态上报周期长度
    pub fn status_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.status_rate_hz)
    }

    /// 从 TOML 文件加载并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: RuntimeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
