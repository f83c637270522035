//! Stack status
//!
//! One `docker ps` snapshot plus a single health probe per HTTP service,
//! rendered as the usual report table. No polling, no mutations.

use std::collections::HashMap;

use crate::config::manifest::Manifest;
use crate::domain::runtime::{ContainerRuntime, ContainerStatus};
use crate::domain::service::{Outcome, ReportEntry, RunReport};
use crate::services::health::HealthProbe;

/// 汇报清单内每个服务的当前状态
pub async fn status(
    runtime: &dyn ContainerRuntime,
    probe: &dyn HealthProbe,
    manifest: &Manifest,
) -> RunReport {
    let mut report = RunReport::new("status");

    let containers: HashMap<String, ContainerStatus> = match runtime.ps().await {
        Ok(list) => list.into_iter().map(|c| (c.name.clone(), c)).collect(),
        Err(e) => {
            report.push(ReportEntry::new(
                "docker",
                Outcome::Failed,
                format!("could not list containers: {}", e),
            ));
            return report;
        }
    };

    for svc in &manifest.services {
        let entry = match containers.get(&svc.container) {
            None => ReportEntry::new(&svc.name, Outcome::Missing, "container not created"),
            Some(c) if !c.is_running() => {
                ReportEntry::new(&svc.name, Outcome::Unhealthy, c.status.clone())
            }
            Some(c) => match &svc.health {
                // 单次探测，不轮询
                Some(health) if !svc.detached => {
                    if probe.check(&health.url).await {
                        ReportEntry::new(&svc.name, Outcome::Running, "healthy")
                    } else {
                        ReportEntry::new(
                            &svc.name,
                            Outcome::Unhealthy,
                            format!("up but {} not responding", health.url),
                        )
                    }
                }
                _ => ReportEntry::new(&svc.name, Outcome::Running, c.status.clone()),
            },
        };
        report.push(entry);
    }

    report
}
