//! DecisionPolicy trait - 决策方接入接口
//!
//! 决策算法本身（推理引擎、学习策略等）不属于本 crate：运行时只
//! 把它当作一个"从状态快照到动作评分"的不透明函数。任何实现了
//! [`DecisionPolicy`] 的类型都可以注入推理周期。
//!
//! # 失败语义
//!
//! `decide` 返回 `Err` 只影响当前 tick：错误被记入日志，上一次的
//! 决策保留在决策槽里（过期的决策对控制周期是可接受的输入，新鲜
//! 度在下游统一把关），下一个 tick 正常重试。失败永远不会中止调度。

use strider_core::SensorSnapshot;
use strider_msgs::ActionVector;

/// 决策方接入接口
///
/// # 生命周期
///
/// - **启动**: `initialize` 在运行时启动时调用一次（加载模型等）；
///   失败时运行时照常运行，但永久停留在 Initializing 模式，控制
///   周期始终走回退分支
/// - **运行**: 推理周期在前置条件满足时调用 `decide`
///
/// # 线程安全
///
/// 实现会被移动到推理线程独占持有，因此只要求 `Send`（由运行时的
/// spawn 约束给出），不要求 `Sync`。
pub trait DecisionPolicy {
    /// 决策方错误类型
    type Error: std::error::Error + Send + 'static;

    /// 启动时初始化（加载模型等），默认无操作
    fn initialize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// 从状态快照计算动作评分
    ///
    /// # 注意
    ///
    /// - 快照的必需通道已通过新鲜度检查，但位姿通道可能缺失
    /// - 实现不应阻塞超过一个推理周期；长时间阻塞会推迟后续 tick
    ///   （tick 之间严格串行，不会并发调用）
    fn decide(&mut self, snapshot: &SensorSnapshot) -> Result<ActionVector, Self::Error>;
}
