//! 运行时错误类型定义

use strider_core::ConfigError;
use thiserror::Error;

/// 运行时错误
///
/// 注意：这里只包含"无法开始运行"级别的错误。运行期间的失败
/// （决策/规划失败、数据过期、输出端拒绝）都不是错误——它们由
/// 各周期的跳过/回退语义就地吸收，永远不会传播到调度层。
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// 配置非法
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 周期线程创建失败
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// 线程名
        name: &'static str,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: RuntimeError = ConfigError::InvalidValue {
            name: "control_rate_hz",
            value: 0.0,
        }
        .into();
        assert!(format!("{}", err).contains("configuration error"));
    }

    #[test]
    fn test_spawn_error_display() {
        let err = RuntimeError::Spawn {
            name: "strider-control",
            source: std::io::Error::new(std::io::ErrorKind::Other, "no threads left"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("strider-control"));
    }
}
