//! 系统运行模式定义
//!
//! 定义导航栈的整体运行模式，用于控制各周期任务的行为。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// 系统运行模式
///
/// # 模式说明
///
/// - **Initializing**: 组件尚未完成启动（或启动失败后永久停留在此）
/// - **Operational**: 前置条件满足，控制周期正常输出规划命令
/// - **Degraded**: 数据缺失/过期或外部计算失败，控制周期输出零运动命令
///
/// # 转换规则
///
/// `Initializing -> Operational` 仅在组件启动成功时发生一次；之后
/// `Operational <-> Degraded` 由控制周期每个 tick 重新计算，没有滞回
/// 和最短驻留时间——前置条件一恢复，下一个 tick 就回到 Operational。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SystemMode {
    /// 启动中（默认）
    #[default]
    Initializing = 0,

    /// 正常运行
    Operational = 1,

    /// 降级运行（安全回退输出）
    Degraded = 2,
}

impl SystemMode {
    /// 从 u8 转换
    ///
    /// 无效值返回 Initializing（最保守的模式）。
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Operational,
            2 => Self::Degraded,
            _ => Self::Initializing,
        }
    }

    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 是否正常运行
    pub fn is_operational(self) -> bool {
        self == Self::Operational
    }

    /// 人类可读的状态概要
    pub fn summary(self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING - waiting for component bring-up",
            Self::Operational => "OPERATIONAL - perception and control loops active",
            Self::Degraded => "DEGRADED - safe stop engaged",
        }
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Operational => write!(f, "Operational"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

/// 系统模式（原子版本，用于线程间共享）
///
/// # 使用场景
///
/// - 控制周期每个 tick 写入重新计算后的模式
/// - 推理周期读取模式决定是否跳过本 tick
/// - 状态上报周期读取模式对外发布
///
/// # 示例
///
/// ```rust
/// use strider_core::mode::{AtomicSystemMode, SystemMode};
///
/// let mode = AtomicSystemMode::new(SystemMode::Initializing);
/// mode.set(SystemMode::Operational);
/// assert!(mode.get().is_operational());
/// ```
#[derive(Debug, Default)]
pub struct AtomicSystemMode {
    inner: AtomicU8,
}

impl AtomicSystemMode {
    /// 创建新的原子模式
    pub fn new(mode: SystemMode) -> Self {
        Self {
            inner: AtomicU8::new(mode.as_u8()),
        }
    }

    /// 获取当前模式
    pub fn get(&self) -> SystemMode {
        SystemMode::from_u8(self.inner.load(Ordering::Relaxed))
    }

    /// 设置模式
    pub fn set(&self, mode: SystemMode) {
        self.inner.store(mode.as_u8(), Ordering::Relaxed);
    }
}

impl Clone for AtomicSystemMode {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}
