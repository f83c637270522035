//! Teardown execution
//!
//! Stops and removes every service container not marked `preserve`.
//! Preserved services are skipped entirely; an absent container counts as
//! already torn down, not an error.

use tracing::info;

use crate::domain::runtime::{ContainerRuntime, RuntimeError};
use crate::domain::service::{Outcome, ReportEntry, RunReport, ServiceSpec};

/// 停止并移除服务容器
///
/// 逆序处理：依赖方先于被依赖方下线
pub async fn tear_down(runtime: &dyn ContainerRuntime, services: &[ServiceSpec]) -> RunReport {
    let mut report = RunReport::new("teardown");

    for svc in services.iter().rev() {
        let entry = tear_down_service(runtime, svc).await;
        info!(
            service = %svc.name,
            outcome = entry.outcome.as_str(),
            "teardown processed"
        );
        report.push(entry);
    }

    report
}

async fn tear_down_service(runtime: &dyn ContainerRuntime, svc: &ServiceSpec) -> ReportEntry {
    if svc.preserve {
        return ReportEntry::new(&svc.name, Outcome::Preserved, "externally managed, skipped");
    }

    match runtime.stop(&svc.container).await {
        Ok(()) => {}
        Err(RuntimeError::NotFound(_)) => {
            return ReportEntry::new(&svc.name, Outcome::Removed, "already absent");
        }
        Err(e) => {
            return ReportEntry::new(&svc.name, Outcome::Failed, format!("stop failed: {}", e));
        }
    }

    match runtime.rm(&svc.container).await {
        Ok(()) => ReportEntry::new(&svc.name, Outcome::Removed, "stopped and removed"),
        Err(RuntimeError::NotFound(_)) => {
            ReportEntry::new(&svc.name, Outcome::Removed, "stopped, already removed")
        }
        Err(e) => ReportEntry::new(&svc.name, Outcome::Failed, format!("rm failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRuntime;

    fn spec(name: &str, preserve: bool) -> ServiceSpec {
        ServiceSpec {
            name: name.to_string(),
            container: format!("watch_{}", name.replace('-', "_")),
            build: None,
            depends_on: Vec::new(),
            health: None,
            preserve,
            detached: false,
            warmup_seconds: 0,
        }
    }

    #[tokio::test]
    async fn test_teardown_never_touches_preserved() {
        let services = vec![
            spec("mongodb", false),
            spec("evolution-api", true),
            spec("app", false),
        ];

        let runtime = RecordingRuntime::new();
        runtime.set_running("watch_mongodb");
        runtime.set_running("watch_evolution_api");
        runtime.set_running("watch_app");

        let report = tear_down(&runtime, &services).await;

        // 被保留服务没有任何 stop/rm 命令
        let issued = runtime.commands();
        assert!(issued.iter().all(|c| !c.contains("watch_evolution_api")));

        let preserved: Vec<&ReportEntry> = report
            .entries
            .iter()
            .filter(|e| e.outcome == Outcome::Preserved)
            .collect();
        assert_eq!(preserved.len(), 1);
        assert_eq!(preserved[0].name, "evolution-api");
    }

    #[tokio::test]
    async fn test_teardown_reverse_order() {
        let services = vec![spec("db", false), spec("app", false)];
        let runtime = RecordingRuntime::new();
        runtime.set_running("watch_db");
        runtime.set_running("watch_app");

        tear_down(&runtime, &services).await;

        let stops = runtime.commands_matching("stop ");
        assert_eq!(stops, vec!["stop watch_app", "stop watch_db"]);
    }

    #[tokio::test]
    async fn test_teardown_absent_container_not_an_error() {
        let services = vec![spec("app", false)];
        let runtime = RecordingRuntime::new();
        // 未标记 running：stop 将返回 NotFound

        let report = tear_down(&runtime, &services).await;

        assert_eq!(report.entries[0].outcome, Outcome::Removed);
        assert_eq!(report.entries[0].detail, "already absent");
        assert!(!report.is_degraded());
    }
}
