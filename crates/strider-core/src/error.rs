//! 配置错误类型定义

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 数值字段非法（非正数或非有限值）
    #[error("invalid config value: {name} = {value}")]
    InvalidValue {
        /// 字段名
        name: &'static str,
        /// 实际值
        value: f64,
    },

    /// 配置文件读取失败
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
