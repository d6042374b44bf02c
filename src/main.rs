//! # SmithKit Monitor 主程序
//!
//! 由外部调度器通过 HTTP 触发的可用性监控与定时任务执行服务

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use smithkit_monitor::{
    AppContext, RunSummary,
    config::ConfigManager,
    database, lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::ManagementServer,
};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "smithkit-monitor", version, about)]
struct Cli {
    /// 配置文件路径（默认读取 SMITHKIT_CONFIG_PATH 或 config/config.{RUST_ENV}.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 仅执行数据库迁移
    Migrate,
    /// 立即检查所有启用的监控并输出汇总
    CheckMonitors,
    /// 立即执行所有到期的定时任务并输出汇总
    RunJobs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path),
        None => ConfigManager::new(),
    }
    .context("Failed to load configuration")?;
    let config = manager.get_config();

    logging::init_logging(Some(&config.logging));
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "config_loaded",
        &format!("配置已加载: {}", manager.config_path().display())
    );

    let db = database::init_database(&config.database)
        .await
        .context("Failed to connect to database")?;
    let pending = database::check_database_status(&db)
        .await
        .context("Failed to read migration status")?;
    if pending > 0 {
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "pending_migrations",
            &format!("待执行的数据库迁移: {pending}")
        );
        database::run_migrations(&db)
            .await
            .context("Failed to run database migrations")?;
    }

    let command = cli.command.unwrap_or(Command::Serve);
    if matches!(command, Command::Migrate) {
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "migrate_done",
            "数据库迁移完成"
        );
        return Ok(());
    }

    let context = Arc::new(AppContext::from_config(config, db)?);

    match command {
        Command::Serve | Command::Migrate => serve(context).await,
        Command::CheckMonitors => {
            let summary = context.runner.run_monitors().await?;
            print_summary(&summary)
        }
        Command::RunJobs => {
            let summary = context.runner.run_due_jobs(Utc::now().naive_utc()).await?;
            print_summary(&summary)
        }
    }
}

/// 启动 HTTP 服务，Ctrl-C 时优雅关闭
async fn serve(context: Arc<AppContext>) -> anyhow::Result<()> {
    if context.cron_secret().is_none() {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "cron_secret_missing",
            "未配置 runner.cron_secret，所有触发调用都会被拒绝"
        );
    }

    let server = ManagementServer::new(context)?;
    let shutdown = CancellationToken::new();

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                linfo!(
                    "system",
                    LogStage::Shutdown,
                    LogComponent::Main,
                    "shutdown_requested",
                    "收到关闭信号"
                );
                signal_token.cancel();
            }
            Err(e) => lerror!(
                "system",
                LogStage::Shutdown,
                LogComponent::Main,
                "signal_listen_fail",
                &format!("监听关闭信号失败: {e}")
            ),
        }
    });

    server.serve(shutdown).await?;
    Ok(())
}

fn print_summary(summary: &RunSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
