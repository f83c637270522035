//! Cleanup execution
//!
//! Non-destructive targets always proceed: log files are archived with a
//! timestamp suffix (forensic history stays), directories are emptied and
//! recreated. Destructive targets (data volumes) sit behind an all-or-nothing
//! confirmation gate: without authorization the whole run aborts before any
//! mutation.

use chrono::Local;
use tracing::info;

use crate::config::env::constants::ARCHIVE_SUFFIX_FORMAT;
use crate::domain::cleanup::{CleanupKind, CleanupTarget};
use crate::domain::runtime::{ContainerRuntime, RuntimeError};
use crate::domain::service::{Outcome, ReportEntry, RunReport};
use crate::error::{OrchestratorError, Result};

/// 执行清理
///
/// 目标列表包含破坏性条目而未授权时，整次运行在触碰任何目标前中止
pub async fn cleanup(
    runtime: &dyn ContainerRuntime,
    targets: &[CleanupTarget],
    allow_destructive: bool,
) -> Result<RunReport> {
    // 全有或全无的闸门：先检查，后动手
    if !allow_destructive && targets.iter().any(|t| t.destructive) {
        return Err(OrchestratorError::ConfirmationRequired);
    }

    let mut report = RunReport::new("cleanup");

    for target in targets {
        let entry = clean_target(runtime, target).await;
        info!(
            target = %target.id,
            kind = target.kind.as_str(),
            outcome = entry.outcome.as_str(),
            "cleanup processed"
        );
        report.push(entry);
    }

    Ok(report)
}

async fn clean_target(runtime: &dyn ContainerRuntime, target: &CleanupTarget) -> ReportEntry {
    match target.kind {
        CleanupKind::Directory => clean_directory(&target.id).await,
        CleanupKind::LogFile => archive_log(&target.id).await,
        CleanupKind::Container => clean_container(runtime, &target.id).await,
        CleanupKind::Volume => clean_volume(runtime, &target.id).await,
    }
}

/// 清空并重建目录；目录不存在则直接创建
async fn clean_directory(path: &str) -> ReportEntry {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return ReportEntry::new(path, Outcome::Failed, format!("remove failed: {}", e));
        }
    }

    match tokio::fs::create_dir_all(path).await {
        Ok(()) => ReportEntry::new(path, Outcome::Recreated, "emptied and recreated"),
        Err(e) => ReportEntry::new(path, Outcome::Failed, format!("recreate failed: {}", e)),
    }
}

/// 日志加时间戳后缀归档，不删除
async fn archive_log(path: &str) -> ReportEntry {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => return ReportEntry::new(path, Outcome::Skipped, "no log file present"),
        Err(e) => return ReportEntry::new(path, Outcome::Failed, format!("stat failed: {}", e)),
    }

    let suffix = Local::now().format(ARCHIVE_SUFFIX_FORMAT);
    let archived = format!("{}.{}", path, suffix);

    match tokio::fs::rename(path, &archived).await {
        Ok(()) => ReportEntry::new(path, Outcome::Archived, format!("archived as {}", archived)),
        Err(e) => ReportEntry::new(path, Outcome::Failed, format!("archive failed: {}", e)),
    }
}

async fn clean_container(runtime: &dyn ContainerRuntime, name: &str) -> ReportEntry {
    match runtime.stop(name).await {
        Ok(()) => {}
        Err(RuntimeError::NotFound(_)) => {
            return ReportEntry::new(name, Outcome::Skipped, "already absent");
        }
        Err(e) => return ReportEntry::new(name, Outcome::Failed, format!("stop failed: {}", e)),
    }

    match runtime.rm(name).await {
        Ok(()) | Err(RuntimeError::NotFound(_)) => {
            ReportEntry::new(name, Outcome::Removed, "stopped and removed")
        }
        Err(e) => ReportEntry::new(name, Outcome::Failed, format!("rm failed: {}", e)),
    }
}

async fn clean_volume(runtime: &dyn ContainerRuntime, name: &str) -> ReportEntry {
    match runtime.volume_rm(name).await {
        Ok(()) => ReportEntry::new(name, Outcome::Removed, "volume removed"),
        Err(RuntimeError::NotFound(_)) => {
            ReportEntry::new(name, Outcome::Skipped, "already absent")
        }
        Err(e) => ReportEntry::new(name, Outcome::Failed, format!("volume rm failed: {}", e)),
    }
}
