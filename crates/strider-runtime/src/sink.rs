//! 命令与状态的输出端
//!
//! 控制周期每个 tick 发出一条命令，状态周期定期发出一条状态报告；
//! 两者都通过 sink trait 解耦到具体的执行机构/监控端。提供两种
//! 现成实现：
//!
//! - **邮箱覆盖槽** ([`MailboxCommandSink`])：只保留最新一条命令，
//!   执行机构按自己的节奏取走。命令是"最新值胜出"的实时数据，
//!   排队只会让底盘执行过期的速度
//! - **有界通道** ([`ChannelCommandSink`] / [`ChannelStatusSink`])：
//!   保留顺序，适合测试和日志消费；队列满时返回错误而不是阻塞

use crate::status::StatusReport;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use strider_msgs::MotionCommand;
use thiserror::Error;

/// 输出端错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SinkError {
    /// 接收端已关闭
    #[error("sink disconnected")]
    Disconnected,

    /// 队列已满
    #[error("sink full")]
    Full,
}

/// 命令输出端
///
/// 实现会被移动到控制线程独占持有。`publish` 不允许长时间阻塞：
/// 控制周期的节拍不能被下游拖慢。
pub trait CommandSink: Send {
    /// 发布一条速度命令
    fn publish(&mut self, command: MotionCommand) -> Result<(), SinkError>;
}

/// 状态输出端
pub trait StatusSink: Send {
    /// 发布一条状态报告
    fn publish(&mut self, report: StatusReport) -> Result<(), SinkError>;
}

// ==================== 邮箱覆盖槽 ====================

/// 邮箱式命令输出端（写入侧）
///
/// 槽里只保留最新一条命令，新命令覆盖未取走的旧命令。覆盖次数
/// 可以从 [`CommandMailbox::overwrites`] 读取：持续增长说明执行
/// 机构消费速度跟不上控制频率。
pub struct MailboxCommandSink {
    slot: Arc<Mutex<Option<MotionCommand>>>,
    overwrites: Arc<AtomicU64>,
}

/// 邮箱式命令输出端（读取侧）
#[derive(Clone)]
pub struct CommandMailbox {
    slot: Arc<Mutex<Option<MotionCommand>>>,
    overwrites: Arc<AtomicU64>,
}

/// 创建一对邮箱端点
pub fn command_mailbox() -> (MailboxCommandSink, CommandMailbox) {
    let slot = Arc::new(Mutex::new(None));
    let overwrites = Arc::new(AtomicU64::new(0));
    (
        MailboxCommandSink {
            slot: slot.clone(),
            overwrites: overwrites.clone(),
        },
        CommandMailbox { slot, overwrites },
    )
}

impl CommandSink for MailboxCommandSink {
    fn publish(&mut self, command: MotionCommand) -> Result<(), SinkError> {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            self.overwrites.fetch_add(1, Ordering::Relaxed);
        }
        *slot = Some(command);
        Ok(())
    }
}

impl CommandMailbox {
    /// 取走最新命令（没有新命令时返回 None）
    pub fn take(&self) -> Option<MotionCommand> {
        self.slot.lock().take()
    }

    /// 查看最新命令但不取走
    pub fn peek(&self) -> Option<MotionCommand> {
        *self.slot.lock()
    }

    /// 累计覆盖次数
    pub fn overwrites(&self) -> u64 {
        self.overwrites.load(Ordering::Relaxed)
    }
}

// ==================== 有界通道 ====================

/// 通道式命令输出端
pub struct ChannelCommandSink {
    tx: Sender<MotionCommand>,
}

/// 创建一对通道端点（命令）
pub fn command_channel(capacity: usize) -> (ChannelCommandSink, Receiver<MotionCommand>) {
    let (tx, rx) = bounded(capacity);
    (ChannelCommandSink { tx }, rx)
}

impl CommandSink for ChannelCommandSink {
    fn publish(&mut self, command: MotionCommand) -> Result<(), SinkError> {
        match self.tx.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SinkError::Full),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

/// 通道式状态输出端
pub struct ChannelStatusSink {
    tx: Sender<StatusReport>,
}

/// 创建一对通道端点（状态）
pub fn status_channel(capacity: usize) -> (ChannelStatusSink, Receiver<StatusReport>) {
    let (tx, rx) = bounded(capacity);
    (ChannelStatusSink { tx }, rx)
}

impl StatusSink for ChannelStatusSink {
    fn publish(&mut self, report: StatusReport) -> Result<(), SinkError> {
        match self.tx.try_send(report) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SinkError::Full),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::SystemMode;

    #[test]
    fn test_mailbox_overwrite() {
        let (mut sink, mailbox) = command_mailbox();

        sink.publish(MotionCommand::new(0.1, 0.0)).unwrap();
        sink.publish(MotionCommand::new(0.2, 0.0)).unwrap();
        sink.publish(MotionCommand::new(0.3, 0.0)).unwrap();

        // 只保留最新一条，前两条被覆盖
        assert_eq!(mailbox.take(), Some(MotionCommand::new(0.3, 0.0)));
        assert_eq!(mailbox.take(), None);
        assert_eq!(mailbox.overwrites(), 2);
    }

    #[test]
    fn test_mailbox_peek_does_not_consume() {
        let (mut sink, mailbox) = command_mailbox();
        sink.publish(MotionCommand::STOP).unwrap();

        assert_eq!(mailbox.peek(), Some(MotionCommand::STOP));
        assert_eq!(mailbox.take(), Some(MotionCommand::STOP));
    }

    #[test]
    fn test_channel_sink_full() {
        let (mut sink, rx) = command_channel(1);
        sink.publish(MotionCommand::STOP).unwrap();
        assert_eq!(sink.publish(MotionCommand::STOP), Err(SinkError::Full));

        rx.recv().unwrap();
        assert!(sink.publish(MotionCommand::STOP).is_ok());
    }

    #[test]
    fn test_channel_sink_disconnected() {
        let (mut sink, rx) = command_channel(1);
        drop(rx);
        assert_eq!(
            sink.publish(MotionCommand::STOP),
            Err(SinkError::Disconnected)
        );
    }

    #[test]
    fn test_status_channel_roundtrip() {
        let (mut sink, rx) = status_channel(4);
        sink.publish(StatusReport::for_mode(SystemMode::Operational))
            .unwrap();

        let report = rx.recv().unwrap();
        assert_eq!(report.mode, SystemMode::Operational);
    }
}
