//! # Strider CLI
//!
//! 导航运行时的命令行工具。
//!
//! ## 用法
//!
//! ```bash
//! # 校验配置并打印生效值
//! strider-cli check --config strider.toml
//!
//! # 用内置仿真数据源跑通整个感知-决策-执行环
//! strider-cli run --goal 3.0,0.0,0.0 --duration 10
//! ```
//!
//! `run` 不需要任何硬件：内置的仿真世界以固定频率推送激光/惯性/
//! 位姿数据，并消费运行时发出的速度命令来推进机器人位姿，用于
//! 演示和联调。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod sim;

use commands::check::CheckArgs;
use commands::run::RunArgs;

/// Strider CLI - 导航运行时命令行工具
#[derive(Parser, Debug)]
#[command(name = "strider-cli")]
#[command(about = "Command-line interface for the strider navigation runtime", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 用内置仿真数据源运行导航环
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// 校验配置文件并打印生效配置
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

fn main() -> Result<()> {
    // 日志初始化：RUST_LOG 可覆盖，默认 info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { args } => commands::run::execute(args),
        Commands::Check { args } => commands::check::execute(args),
    }
}
