//! wv-deployctl - WatchVine 部署编排命令行
//!
//! Usage:
//! - Deploy the stack: `wv-deployctl deploy --build`
//! - Stack status: `wv-deployctl status`
//! - Copy artifacts: `wv-deployctl copy-files --container watch_whatsapp_bot --restart`
//! - Routine cleanup: `wv-deployctl cleanup`
//! - Full cleanup (drops data volumes): `wv-deployctl cleanup --full --yes`

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use uuid::Uuid;

use wv_deployctl::config::env::constants::{BUILD_TIMEOUT_SECS, DEFAULT_MANIFEST};
use wv_deployctl::config::{EnvConfig, Manifest};
use wv_deployctl::domain::plan::DeploymentPlan;
use wv_deployctl::error::Result;
use wv_deployctl::infra::DockerCli;
use wv_deployctl::report;
use wv_deployctl::services::deploy::{bring_up, DeployOptions};
use wv_deployctl::services::health::HttpProbe;
use wv_deployctl::services::{cleanup, copy, preflight, status, teardown};

#[derive(Parser)]
#[command(name = "wv-deployctl", version)]
#[command(about = "WatchVine deployment orchestrator", long_about = None)]
struct Cli {
    /// Manifest path (default: WV_DEPLOY_CONFIG or watchvine.yml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start all services in dependency order and verify health
    Deploy {
        /// Build images before starting
        #[arg(long)]
        build: bool,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Stop and remove service containers (preserved services are skipped)
    Teardown,

    /// Archive logs, recreate scratch directories, remove stale containers
    Cleanup {
        /// Include destructive targets (persisted data volumes)
        #[arg(long)]
        full: bool,

        /// Supply the confirmation non-interactively
        #[arg(long)]
        yes: bool,
    },

    /// Copy configured artifacts into a running container
    CopyFiles {
        /// Target container name
        #[arg(long)]
        container: String,

        /// Restart the container afterwards and re-verify health
        #[arg(long)]
        restart: bool,
    },

    /// Show container and health status for every service in the manifest
    Status,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wv_deployctl=warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let exit_code = rt.block_on(async {
        match run(cli).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                1
            }
        }
    });

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let env = EnvConfig::from_env();
    let manifest_path = cli
        .config
        .or_else(|| env.manifest_path.clone())
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());

    let manifest = Manifest::load(Path::new(&manifest_path))?;

    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, manifest = %manifest_path, "starting run");

    // 所有操作的前置条件：运行时与 compose 工具可达
    let caps = preflight::preflight().await?;

    let runtime = DockerCli::new(
        caps.compose.clone(),
        manifest.compose_file.clone(),
        Duration::from_secs(env.command_timeout_secs),
        Duration::from_secs(BUILD_TIMEOUT_SECS),
    );
    let probe = HttpProbe::new();
    let poll_interval = Duration::from_millis(env.poll_interval_ms);

    match cli.command {
        Commands::Deploy { build, json } => {
            let plan = DeploymentPlan::plan(manifest.services.clone())?;
            let opts = DeployOptions {
                build_first: build,
                poll_interval,
            };
            let run_report = bring_up(&runtime, &probe, &plan, &opts).await;
            if json {
                println!("{}", report::render_json(&run_report));
            } else {
                println!("{}", report::render(&run_report));
            }
            Ok(0)
        }

        Commands::Teardown => {
            // 先做计划校验（依赖环同样是拆除时的配置错误），再逆序拆
            let plan = DeploymentPlan::plan(manifest.services.clone())?;
            let run_report = teardown::tear_down(&runtime, plan.services()).await;
            println!("{}", report::render(&run_report));
            Ok(0)
        }

        Commands::Cleanup { full, yes } => {
            let targets: Vec<_> = if full {
                manifest.cleanup.clone()
            } else {
                // 默认清理绝不触碰破坏性目标
                manifest
                    .cleanup
                    .iter()
                    .filter(|t| !t.destructive)
                    .cloned()
                    .collect()
            };

            let has_destructive = targets.iter().any(|t| t.destructive);
            if has_destructive && !yes && !confirm_destructive()? {
                println!("Aborted.");
                return Ok(0); // 用户取消不是错误
            }

            let run_report = cleanup::cleanup(&runtime, &targets, full).await?;
            println!("{}", report::render(&run_report));
            Ok(0)
        }

        Commands::CopyFiles { container, restart } => {
            let mut run_report =
                copy::copy_artifacts(&runtime, &manifest.artifacts, &container).await;
            if restart {
                copy::restart_and_verify(
                    &runtime,
                    &probe,
                    &manifest,
                    &container,
                    poll_interval,
                    &mut run_report,
                )
                .await;
            }
            println!("{}", report::render(&run_report));
            Ok(0)
        }

        Commands::Status => {
            let run_report = status::status(&runtime, &probe, &manifest).await;
            println!("{}", report::render(&run_report));
            Ok(0)
        }
    }
}

/// 交互式确认破坏性清理：只接受整行 "yes"
fn confirm_destructive() -> Result<bool> {
    print!(
        "{} This will remove persisted data volumes. Type 'yes' to continue: ",
        "⚠".yellow().bold()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "yes")
}
