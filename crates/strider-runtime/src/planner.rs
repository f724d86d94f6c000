//! MotionPlanner trait - 运动规划方接入接口
//!
//! 与决策方一样，轨迹/路径规划算法对本 crate 是不透明的：控制周期
//! 把快照、最近的决策（可能缺失或过期）和当前目标（可能缺失）交给
//! 规划方，拿回一条速度命令。命令随后仍要经过安全门的限幅和障碍
//! 接近保护——规划方不承担最终的安全责任。
//!
//! # 失败语义
//!
//! `plan` 返回 `Err` 时，本 tick 发出零运动命令并进入 Degraded 模式；
//! 下一个 tick 正常重试。单次失败不会中止调度。

use strider_core::{Decision, SensorSnapshot};
use strider_msgs::{Goal, MotionCommand};

/// 运动规划方接入接口
///
/// # 参数约定
///
/// - `decision`: 最近一次推理结果。决策周期和控制周期的频率是独立
///   配置的，所以这里的决策可能比当前控制周期旧，也可能还不存在
///   （推理尚未产出）——两种情况都是正常输入，由实现自行决定如何
///   退化
/// - `goal`: 当前导航目标；可达性判断是规划方的职责
pub trait MotionPlanner {
    /// 规划方错误类型
    type Error: std::error::Error + Send + 'static;

    /// 启动时初始化，默认无操作
    fn initialize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// 计算一条速度命令
    ///
    /// 返回的命令会被安全门钳位；实现不需要自行限幅，但输出应当
    /// 是有限值。
    fn plan(
        &mut self,
        snapshot: &SensorSnapshot,
        decision: Option<&Decision>,
        goal: Option<&Goal>,
    ) -> Result<MotionCommand, Self::Error>;
}
