//! check 子命令：校验配置并打印生效值

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use strider_core::RuntimeConfig;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// 配置文件路径（省略时检查默认配置）
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 执行 check
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RuntimeConfig::load_from_file(path)
            .with_context(|| format!("invalid config file: {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    println!("# effective configuration");
    print!("{}", toml::to_string_pretty(&config)?);
    println!(
        "# derived sensor_max_age = {:.3}s",
        config.sensor_max_age().as_secs_f64()
    );
    Ok(())
}
