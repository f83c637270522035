//! Preflight checks
//!
//! Verifies the container runtime and its compose tool are actually reachable
//! before any other operation runs. Everything downstream assumes this passed.

use std::time::Duration;

use tracing::info;

use crate::error::{OrchestratorError, Result};
use crate::infra::command::CommandRunner;
use crate::infra::docker::{detect_compose_command, ComposeCommand};

/// preflight 结果：后续所有操作共享
#[derive(Clone, Debug)]
pub struct CapabilitySet {
    /// docker server 版本
    pub docker_version: String,
    /// 探测到的 compose 命令形态
    pub compose: ComposeCommand,
}

/// 校验 docker daemon 与 compose 工具可达
///
/// 任一不可达都是致命错误，直接中止整次调用
pub async fn preflight() -> Result<CapabilitySet> {
    // docker daemon
    let output = CommandRunner::run_simple(
        "docker",
        &["version", "--format", "{{.Server.Version}}"],
        Duration::from_secs(15),
    )
    .await
    .map_err(|e| OrchestratorError::RuntimeUnavailable(format!("docker not runnable: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(OrchestratorError::RuntimeUnavailable(format!(
            "docker daemon not reachable: {}",
            stderr
        )));
    }

    let docker_version = String::from_utf8_lossy(&output.stdout).trim().to_string();

    // compose 工具
    let compose = detect_compose_command().await;
    let mut args: Vec<&str> = compose.prefix.clone();
    args.push("version");

    let check = CommandRunner::run_simple(compose.program, &args, Duration::from_secs(15))
        .await
        .map_err(|e| {
            OrchestratorError::RuntimeUnavailable(format!(
                "compose tool ({}) not runnable: {}",
                compose.display(),
                e
            ))
        })?;

    if !check.status.success() {
        return Err(OrchestratorError::RuntimeUnavailable(format!(
            "compose tool ({}) not functional",
            compose.display()
        )));
    }

    info!(
        docker_version = %docker_version,
        compose = %compose.display(),
        "preflight passed"
    );

    Ok(CapabilitySet {
        docker_version,
        compose,
    })
}
