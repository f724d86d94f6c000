//! run 子命令：用内置仿真数据源运行导航环

use crate::sim;
use crate::sim::{SeekPlanner, SimPolicy};
use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use strider_core::RuntimeConfig;
use strider_msgs::{Goal, Pose2D};
use strider_runtime::RuntimeBuilder;
use strider_runtime::sink::{command_channel, status_channel};
use tracing::info;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 运行时长（秒，省略时运行到 Ctrl-C）
    #[arg(long)]
    pub duration: Option<f64>,

    /// 导航目标 "x,y,theta"
    #[arg(long)]
    pub goal: Option<String>,

    /// 覆盖控制周期频率（Hz）
    #[arg(long)]
    pub control_rate: Option<f64>,

    /// 覆盖推理周期频率（Hz）
    #[arg(long)]
    pub inference_rate: Option<f64>,

    /// 覆盖线速度上限（m/s）
    #[arg(long)]
    pub max_velocity: Option<f64>,

    /// 覆盖障碍接近保护距离（米）
    #[arg(long)]
    pub safety_distance: Option<f64>,

    /// 决策模型路径（覆盖配置文件）
    #[arg(long)]
    pub model: Option<String>,
}

/// 执行 run
pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load_from_file(path)
            .with_context(|| format!("invalid config file: {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    // 命令行覆盖
    if let Some(rate) = args.control_rate {
        config.control_rate_hz = rate;
    }
    if let Some(rate) = args.inference_rate {
        config.inference_rate_hz = rate;
    }
    if let Some(velocity) = args.max_velocity {
        config.max_velocity = velocity;
    }
    if let Some(distance) = args.safety_distance {
        config.safety_distance = distance;
    }
    if let Some(model) = &args.model {
        config.decision_model_path = Some(model.clone());
    }

    let goal = args.goal.as_deref().map(parse_goal).transpose()?;

    // === 启动运行时 ===
    let (command_sink, commands) = command_channel(256);
    let (status_sink, status) = status_channel(64);
    let policy = SimPolicy::new(config.decision_model_path.clone());
    let planner = SeekPlanner::new();

    let runtime = RuntimeBuilder::new()
        .config(config)
        .spawn(policy, planner, command_sink, status_sink)
        .context("failed to start runtime")?;

    if let Some(goal) = goal {
        info!(%goal, "navigation goal set");
        runtime.feed().set_goal(goal);
    }

    // === Ctrl-C ===
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .context("failed to install Ctrl-C handler")?;
    }

    // === 仿真数据源 ===
    let sim_thread = {
        let feed = runtime.feed();
        let stop = stop.clone();
        thread::spawn(move || sim::drive(feed, commands, stop))
    };

    // === 主循环：转发状态报告，到时或收到 Ctrl-C 退出 ===
    let deadline = args.duration.map(|d| Instant::now() + Duration::from_secs_f64(d));
    while !stop.load(Ordering::SeqCst) {
        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            break;
        }
        while let Ok(report) = status.try_recv() {
            info!("{report}");
        }
        thread::sleep(Duration::from_millis(50));
    }
    stop.store(true, Ordering::SeqCst);

    if sim_thread.join().is_err() {
        bail!("simulation thread panicked");
    }

    let metrics = runtime.metrics();
    let diagnostics = runtime.diagnostics();
    runtime.shutdown();

    info!(
        control_ticks = metrics.control_ticks,
        control_fallbacks = metrics.control_fallbacks,
        commands_emitted = metrics.commands_emitted,
        inference_failures = metrics.inference_failures,
        "run finished"
    );
    if let Some(command) = diagnostics.last_command {
        info!(%command, "last emitted command");
    }

    Ok(())
}

/// 解析 "x,y,theta" 形式的目标
fn parse_goal(text: &str) -> Result<Goal> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("goal must be \"x,y,theta\", got: {text}");
    }
    let mut values = [0.0f64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .with_context(|| format!("invalid goal component: {part}"))?;
    }
    Ok(Goal::new(Pose2D::new(values[0], values[1], values[2])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goal() {
        let goal = parse_goal("3.0, -1.5, 0.7").unwrap();
        assert_eq!(goal.pose.x, 3.0);
        assert_eq!(goal.pose.y, -1.5);
        assert_eq!(goal.pose.theta, 0.7);
    }

    #[test]
    fn test_parse_goal_rejects_bad_input() {
        assert!(parse_goal("3.0").is_err());
        assert!(parse_goal("a,b,c").is_err());
        assert!(parse_goal("1,2,3,4").is_err());
    }
}
