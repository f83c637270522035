//! Artifact copy
//!
//! Copies the manifest's artifact list into a running container. Missing
//! local files degrade to warnings and the batch continues; restart is a
//! separate explicit step that re-polls the service's health check.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::manifest::{ArtifactFile, Manifest};
use crate::domain::runtime::ContainerRuntime;
use crate::domain::service::{Outcome, ReportEntry, RunReport};
use crate::services::health::{poll_until_healthy, HealthProbe};

/// 把清单中的文件拷贝进目标容器
///
/// 本地缺失的文件记为警告并继续，绝不中断整批
pub async fn copy_artifacts(
    runtime: &dyn ContainerRuntime,
    files: &[ArtifactFile],
    container: &str,
) -> RunReport {
    let mut report = RunReport::new("copy-files");

    if files.is_empty() {
        report.push(ReportEntry::new(
            container,
            Outcome::Warning,
            "manifest declares no artifacts",
        ));
        return report;
    }

    for file in files {
        if !Path::new(&file.local).exists() {
            warn!(file = %file.local, "local file missing, skipped");
            report.push(ReportEntry::new(
                &file.local,
                Outcome::Warning,
                "local file missing, skipped",
            ));
            continue;
        }

        match runtime.cp(&file.local, container, &file.remote).await {
            Ok(()) => {
                info!(file = %file.local, container = %container, "copied");
                report.push(ReportEntry::new(
                    &file.local,
                    Outcome::Copied,
                    format!("-> {}:{}", container, file.remote),
                ));
            }
            Err(e) => {
                report.push(ReportEntry::new(
                    &file.local,
                    Outcome::Failed,
                    format!("copy failed: {}", e),
                ));
            }
        }
    }

    report
}

/// 拷贝后显式重启并重新验证健康
pub async fn restart_and_verify(
    runtime: &dyn ContainerRuntime,
    probe: &dyn HealthProbe,
    manifest: &Manifest,
    container: &str,
    poll_interval: Duration,
    report: &mut RunReport,
) {
    if let Err(e) = runtime.restart(container).await {
        report.push(ReportEntry::new(
            container,
            Outcome::Failed,
            format!("restart failed: {}", e),
        ));
        return;
    }

    // 找到对应服务的健康检查，重启后重新轮询
    let health = manifest
        .service_by_container(container)
        .and_then(|s| s.health.as_ref());

    match health {
        Some(health) => {
            let result = poll_until_healthy(
                probe,
                &health.url,
                Duration::from_secs(health.timeout_seconds),
                poll_interval,
            )
            .await;

            if result.healthy {
                report.push(ReportEntry::new(
                    container,
                    Outcome::Running,
                    format!("restarted, healthy after {} attempt(s)", result.attempts),
                ));
            } else {
                report.push(ReportEntry::new(
                    container,
                    Outcome::Unhealthy,
                    format!("restarted, no healthy response within {}s", health.timeout_seconds),
                ));
            }
        }
        None => {
            report.push(ReportEntry::new(container, Outcome::Running, "restarted"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingRuntime, ScriptedProbe};
    use std::io::Write;

    fn artifact(local: &str, remote: &str) -> ArtifactFile {
        ArtifactFile {
            local: local.to_string(),
            remote: remote.to_string(),
        }
    }

    #[tokio::test]
    async fn test_copy_partial_batch_with_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();

        // 5 个文件，其中 2 个缺失
        for i in 0..3 {
            let path = dir.path().join(format!("present_{}.py", i));
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "# artifact {}", i).unwrap();
            files.push(artifact(path.to_str().unwrap(), "/app/file.py"));
        }
        files.push(artifact("/nonexistent/one.py", "/app/one.py"));
        files.push(artifact("/nonexistent/two.py", "/app/two.py"));

        let runtime = RecordingRuntime::new();
        runtime.set_running("watch_whatsapp_bot");

        let report = copy_artifacts(&runtime, &files, "watch_whatsapp_bot").await;

        let copied = report
            .entries
            .iter()
            .filter(|e| e.outcome == Outcome::Copied)
            .count();
        let warnings = report
            .entries
            .iter()
            .filter(|e| e.outcome == Outcome::Warning)
            .count();

        assert_eq!(copied, 3);
        assert_eq!(warnings, 2);
        assert_eq!(runtime.commands_matching("cp ").len(), 3);
        // 降级但未中断
        assert!(report.is_degraded());
        assert_eq!(report.entries.len(), 5);
    }

    #[tokio::test]
    async fn test_copy_empty_artifact_list_warns() {
        let runtime = RecordingRuntime::new();
        let report = copy_artifacts(&runtime, &[], "watch_whatsapp_bot").await;
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].outcome, Outcome::Warning);
    }

    #[tokio::test]
    async fn test_restart_and_verify_repolls_health() {
        let manifest = Manifest::parse(
            r#"
services:
  - name: whatsapp-bot
    container: watch_whatsapp_bot
    health:
      url: http://localhost:8000/health
      timeout_seconds: 1
"#,
        )
        .unwrap();

        let runtime = RecordingRuntime::new();
        runtime.set_running("watch_whatsapp_bot");
        let probe = ScriptedProbe::always(true);

        let mut report = RunReport::new("copy-files");
        restart_and_verify(
            &runtime,
            &probe,
            &manifest,
            "watch_whatsapp_bot",
            Duration::from_millis(10),
            &mut report,
        )
        .await;

        assert_eq!(runtime.commands_matching("restart ").len(), 1);
        assert_eq!(probe.calls(), 1);
        assert_eq!(report.entries[0].outcome, Outcome::Running);
        assert!(report.entries[0].detail.contains("restarted"));
    }

    #[tokio::test]
    async fn test_restart_without_health_check() {
        let manifest = Manifest::parse(
            "services:\n  - name: scraper\n    container: watch_scraper\n",
        )
        .unwrap();

        let runtime = RecordingRuntime::new();
        runtime.set_running("watch_scraper");
        let probe = ScriptedProbe::always(false);

        let mut report = RunReport::new("copy-files");
        restart_and_verify(
            &runtime,
            &probe,
            &manifest,
            "watch_scraper",
            Duration::from_millis(10),
            &mut report,
        )
        .await;

        assert_eq!(probe.calls(), 0);
        assert_eq!(report.entries[0].outcome, Outcome::Running);
        assert_eq!(report.entries[0].detail, "restarted");
    }
}
