//! 机器人共享状态存储
//!
//! 所有周期任务和传感器生产者汇聚的状态中心。高频通道（扫描、惯性、
//! 位姿、决策、目标）使用 `ArcSwap` 整体替换：写入方 store 一条新
//! 分配的记录，读取方 load 得到不可变快照，没有任何就地修改，因此
//! 读者永远不会观察到"半条记录"。通道之间不保证顺序——快照是一次
//! 逐通道的时间点合并，各通道可以独立过期。

use crate::mode::{AtomicSystemMode, SystemMode};
use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strider_msgs::{ActionVector, Goal, ImuSample, MotionCommand, Pose2D, RangeScan};

/// 带到达时间戳的记录
///
/// 时间戳在数据入库时盖章（而不是由消息自带），这样"年龄"的语义对
/// 所有通道一致：now − 最近一次成功写入的时刻。
#[derive(Debug, Clone)]
pub struct Stamped<T> {
    /// 记录值
    pub value: T,
    /// 入库时刻
    pub recv_at: Instant,
}

impl<T> Stamped<T> {
    /// 以指定时刻创建记录
    pub fn at(value: T, recv_at: Instant) -> Self {
        Self { value, recv_at }
    }

    /// 以当前时刻创建记录
    pub fn now(value: T) -> Self {
        Self::at(value, Instant::now())
    }

    /// 相对 `now` 的年龄
    ///
    /// `now` 早于入库时刻时返回零（饱和减法），不会 panic。
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.recv_at)
    }
}

/// 传感器通道标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// 激光测距
    Range,
    /// 惯性测量
    Inertial,
    /// 位姿/里程计
    Pose,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Range => write!(f, "range"),
            Channel::Inertial => write!(f, "inertial"),
            Channel::Pose => write!(f, "pose"),
        }
    }
}

/// 快照中各通道的入库时刻
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStamps {
    /// 扫描通道入库时刻（从未收到时为 None）
    pub scan: Option<Instant>,
    /// 惯性通道入库时刻
    pub imu: Option<Instant>,
    /// 位姿通道入库时刻
    pub pose: Option<Instant>,
}

/// 推理结果
///
/// 由推理周期独占写入，控制周期只读。`sources` 记录产生本次决策时
/// 各通道的入库时刻，便于追溯决策依据的数据年龄。
#[derive(Debug, Clone)]
pub struct Decision {
    /// 决策评分向量
    pub action: ActionVector,
    /// 产生时刻
    pub produced_at: Instant,
    /// 决策所依据的快照时间戳
    pub sources: SnapshotStamps,
}

/// 传感器状态快照
///
/// 一次逐通道读取的一致性合并：每个字段要么是 `None`（从未收到），
/// 要么是某次完整写入的记录。`captured_at` 是快照时刻，所有年龄都
/// 相对它计算，保证同一快照内的新鲜度判定使用同一个"现在"。
#[derive(Debug, Clone)]
pub struct SensorSnapshot {
    /// 最近一帧激光扫描
    pub scan: Option<Arc<Stamped<RangeScan>>>,
    /// 最近一次惯性采样
    pub imu: Option<Arc<Stamped<ImuSample>>>,
    /// 最近一次位姿
    pub pose: Option<Arc<Stamped<Pose2D>>>,
    /// 快照时刻
    pub captured_at: Instant,
}

impl SensorSnapshot {
    /// 指定通道相对快照时刻的年龄
    ///
    /// 从未收到的通道返回 `None`。
    pub fn age_of(&self, channel: Channel) -> Option<Duration> {
        match channel {
            Channel::Range => self.scan.as_ref().map(|s| s.age(self.captured_at)),
            Channel::Inertial => self.imu.as_ref().map(|s| s.age(self.captured_at)),
            Channel::Pose => self.pose.as_ref().map(|s| s.age(self.captured_at)),
        }
    }

    /// 扫描通道中最近的有效障碍距离（米）
    ///
    /// 没有扫描数据或扫描中无有效读数时返回 `None`。
    pub fn min_range(&self) -> Option<f32> {
        self.scan.as_ref().and_then(|s| s.value.min_range())
    }

    /// 各通道的入库时刻
    pub fn stamps(&self) -> SnapshotStamps {
        SnapshotStamps {
            scan: self.scan.as_ref().map(|s| s.recv_at),
            imu: self.imu.as_ref().map(|s| s.recv_at),
            pose: self.pose.as_ref().map(|s| s.recv_at),
        }
    }
}

/// 低频诊断记录
///
/// 控制周期在回退时更新，读取频率低，用 `RwLock` 即可。
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// 最近一次回退的原因（人类可读）
    pub last_hold: Option<String>,
    /// 累计回退次数
    pub holds_total: u64,
    /// 最近一次发出的命令
    pub last_command: Option<MotionCommand>,
}

/// 机器人共享状态上下文（所有状态的聚合）
///
/// # 并发约定
///
/// - 高频通道全部是 `ArcSwapOption`：store 新记录 / load 快照副本，
///   生产者之间、生产者与读者之间互不阻塞
/// - 单通道内写入按到达顺序生效，最后写入者胜出
/// - 通道之间不保证任何顺序
/// - 低频诊断走 `RwLock`，持锁只覆盖一次读写
pub struct RobotContext {
    /// 激光扫描通道
    scan: ArcSwapOption<Stamped<RangeScan>>,
    /// 惯性测量通道
    imu: ArcSwapOption<Stamped<ImuSample>>,
    /// 位姿/里程计通道
    pose: ArcSwapOption<Stamped<Pose2D>>,
    /// 推理结果槽（推理周期独占写入）
    decision: ArcSwapOption<Decision>,
    /// 当前导航目标（last-writer-wins）
    goal: ArcSwapOption<Stamped<Goal>>,
    /// 系统运行模式
    mode: AtomicSystemMode,
    /// 低频诊断记录
    diagnostics: RwLock<Diagnostics>,
}

impl RobotContext {
    /// 创建空上下文（所有通道未收到数据，模式为 Initializing）
    pub fn new() -> Self {
        Self {
            scan: ArcSwapOption::empty(),
            imu: ArcSwapOption::empty(),
            pose: ArcSwapOption::empty(),
            decision: ArcSwapOption::empty(),
            goal: ArcSwapOption::empty(),
            mode: AtomicSystemMode::default(),
            diagnostics: RwLock::new(Diagnostics::default()),
        }
    }

    // === 传感器通道写入（生产者侧） ===

    /// 写入一帧激光扫描（以当前时刻盖章）
    pub fn push_scan(&self, scan: RangeScan) {
        self.push_scan_at(scan, Instant::now());
    }

    /// 写入一帧激光扫描（指定入库时刻，用于测试和回放）
    pub fn push_scan_at(&self, scan: RangeScan, recv_at: Instant) {
        self.scan.store(Some(Arc::new(Stamped::at(scan, recv_at))));
    }

    /// 写入一次惯性采样
    pub fn push_imu(&self, sample: ImuSample) {
        self.push_imu_at(sample, Instant::now());
    }

    /// 写入一次惯性采样（指定入库时刻）
    pub fn push_imu_at(&self, sample: ImuSample, recv_at: Instant) {
        self.imu.store(Some(Arc::new(Stamped::at(sample, recv_at))));
    }

    /// 写入一次位姿
    pub fn push_pose(&self, pose: Pose2D) {
        self.push_pose_at(pose, Instant::now());
    }

    /// 写入一次位姿（指定入库时刻）
    pub fn push_pose_at(&self, pose: Pose2D, recv_at: Instant) {
        self.pose.store(Some(Arc::new(Stamped::at(pose, recv_at))));
    }

    // === 目标槽 ===

    /// 设置导航目标（覆盖旧目标）
    pub fn set_goal(&self, goal: Goal) {
        self.goal.store(Some(Arc::new(Stamped::now(goal))));
    }

    /// 清除当前目标
    pub fn clear_goal(&self) {
        self.goal.store(None);
    }

    /// 当前目标（从未设置或已清除时为 None）
    pub fn goal(&self) -> Option<Arc<Stamped<Goal>>> {
        self.goal.load_full()
    }

    // === 决策槽 ===

    /// 原子替换推理结果
    pub fn store_decision(&self, decision: Decision) {
        self.decision.store(Some(Arc::new(decision)));
    }

    /// 最近一次推理结果（可能缺失或早于当前控制周期）
    pub fn latest_decision(&self) -> Option<Arc<Decision>> {
        self.decision.load_full()
    }

    // === 快照 ===

    /// 以当前时刻拍摄快照
    pub fn snapshot(&self) -> SensorSnapshot {
        self.snapshot_at(Instant::now())
    }

    /// 以指定时刻拍摄快照
    ///
    /// 每个通道恰好 load 一次；年龄统一相对 `now` 计算。
    pub fn snapshot_at(&self, now: Instant) -> SensorSnapshot {
        SensorSnapshot {
            scan: self.scan.load_full(),
            imu: self.imu.load_full(),
            pose: self.pose.load_full(),
            captured_at: now,
        }
    }

    // === 模式 ===

    /// 当前系统模式
    pub fn mode(&self) -> SystemMode {
        self.mode.get()
    }

    /// 设置系统模式
    pub fn set_mode(&self, mode: SystemMode) {
        self.mode.set(mode);
    }

    // === 诊断 ===

    /// 记录一次回退
    pub fn record_hold(&self, reason: impl fmt::Display) {
        let mut diag = self.diagnostics.write();
        diag.last_hold = Some(reason.to_string());
        diag.holds_total += 1;
    }

    /// 记录最近发出的命令
    pub fn record_command(&self, command: MotionCommand) {
        self.diagnostics.write().last_command = Some(command);
    }

    /// 诊断记录副本
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics.read().clone()
    }
}

impl Default for RobotContext {
    fn default() -> Self {
        Self::new()
    }
}
