//! Deployment execution
//!
//! Brings the plan up in dependency order: optional image build, idempotent
//! start, warm-up wait, bounded health polling. Per-service failures degrade
//! the report but never abort the rest of the plan.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::plan::DeploymentPlan;
use crate::domain::runtime::ContainerRuntime;
use crate::domain::service::{Outcome, ReportEntry, RunReport, ServiceSpec};
use crate::services::health::{poll_until_healthy, HealthProbe};

/// bring_up 选项
#[derive(Clone, Debug)]
pub struct DeployOptions {
    /// 启动前先构建镜像
    pub build_first: bool,
    /// 健康轮询间隔
    pub poll_interval: Duration,
}

/// 按计划顺序启动所有服务
///
/// 幂等：先查询当前容器状态，已在运行的服务不再下发 up；
/// 单个服务失败只记录，后续服务照常处理
pub async fn bring_up(
    runtime: &dyn ContainerRuntime,
    probe: &dyn HealthProbe,
    plan: &DeploymentPlan,
    opts: &DeployOptions,
) -> RunReport {
    let mut report = RunReport::new("deploy");

    // 启动前一次性快照当前状态
    let running: HashMap<String, bool> = match runtime.ps().await {
        Ok(list) => list
            .into_iter()
            .map(|c| (c.name.clone(), c.is_running()))
            .collect(),
        Err(e) => {
            warn!(error = %e, "could not list containers, assuming clean slate");
            HashMap::new()
        }
    };

    for svc in plan.services() {
        let entry =
            deploy_service(runtime, probe, svc, plan.has_dependents(&svc.name), &running, opts)
                .await;
        info!(
            service = %svc.name,
            outcome = entry.outcome.as_str(),
            detail = %entry.detail,
            "service processed"
        );
        report.push(entry);
    }

    report
}

/// 处理单个服务，任何失败都折叠为一条报告条目
async fn deploy_service(
    runtime: &dyn ContainerRuntime,
    probe: &dyn HealthProbe,
    svc: &ServiceSpec,
    has_dependents: bool,
    running: &HashMap<String, bool>,
    opts: &DeployOptions,
) -> ReportEntry {
    let already_running = running.get(&svc.container).copied().unwrap_or(false);

    // 外部托管服务只校验，不启动
    if svc.preserve {
        return if already_running {
            ReportEntry::new(&svc.name, Outcome::Running, "externally managed")
        } else {
            ReportEntry::new(
                &svc.name,
                Outcome::Warning,
                "externally managed but not running",
            )
        };
    }

    // 可选构建
    if opts.build_first {
        if let Some(target) = &svc.build {
            if let Err(e) = runtime.build(target).await {
                return ReportEntry::new(&svc.name, Outcome::Failed, format!("build failed: {}", e));
            }
        }
    }

    // 后台任务：启动后立即放手
    if svc.detached {
        if already_running {
            return ReportEntry::new(&svc.name, Outcome::Detached, "already running");
        }
        return match runtime.up(&svc.name).await {
            Ok(()) => ReportEntry::new(&svc.name, Outcome::Detached, "started, not awaited"),
            Err(e) => ReportEntry::new(&svc.name, Outcome::Failed, format!("start failed: {}", e)),
        };
    }

    // 幂等启动；新启动的被依赖服务先做固定预热等待
    if !already_running {
        if let Err(e) = runtime.up(&svc.name).await {
            return ReportEntry::new(&svc.name, Outcome::Failed, format!("start failed: {}", e));
        }
        if has_dependents && svc.warmup_seconds > 0 {
            tokio::time::sleep(Duration::from_secs(svc.warmup_seconds)).await;
        }
    }

    // 健康验证
    match &svc.health {
        Some(health) => {
            let result = poll_until_healthy(
                probe,
                &health.url,
                Duration::from_secs(health.timeout_seconds),
                opts.poll_interval,
            )
            .await;

            if result.healthy {
                ReportEntry::new(
                    &svc.name,
                    Outcome::Running,
                    format!("healthy after {} attempt(s)", result.attempts),
                )
            } else {
                ReportEntry::new(
                    &svc.name,
                    Outcome::Unhealthy,
                    format!(
                        "no healthy response within {}s ({} attempt(s))",
                        health.timeout_seconds, result.attempts
                    ),
                )
            }
        }
        None => ReportEntry::new(&svc.name, Outcome::Running, "container running"),
    }
}
