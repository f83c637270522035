//! docker / docker compose 驱动
//!
//! `ContainerRuntime` 的真实实现：所有操作落到 docker CLI，
//! 输出按分隔符解析，不依赖 docker API SDK

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::runtime::{ContainerRuntime, ContainerStatus, RuntimeError};
use crate::infra::command::CommandRunner;

/// compose 命令形态
///
/// 旧机器装的是独立的 docker-compose 二进制，新机器是 docker compose 插件
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeCommand {
    pub program: &'static str,
    pub prefix: Vec<&'static str>,
}

impl ComposeCommand {
    pub fn standalone() -> Self {
        Self {
            program: "docker-compose",
            prefix: vec![],
        }
    }

    pub fn plugin() -> Self {
        Self {
            program: "docker",
            prefix: vec!["compose"],
        }
    }

    /// 人类可读形式（日志用）
    pub fn display(&self) -> String {
        if self.prefix.is_empty() {
            self.program.to_string()
        } else {
            format!("{} {}", self.program, self.prefix.join(" "))
        }
    }
}

/// 探测可用的 compose 命令（优先独立二进制，回退到插件）
pub async fn detect_compose_command() -> ComposeCommand {
    let check = CommandRunner::run_simple("which", &["docker-compose"], Duration::from_secs(10))
        .await;

    if check.map(|o| o.status.success()).unwrap_or(false) {
        ComposeCommand::standalone()
    } else {
        ComposeCommand::plugin()
    }
}

/// docker CLI 驱动
pub struct DockerCli {
    compose: ComposeCommand,
    compose_file: String,
    work_dir: PathBuf,
    /// 短命令超时（ps / stop / rm / cp）
    command_timeout: Duration,
    /// 长命令超时（build / up）
    build_timeout: Duration,
}

impl DockerCli {
    pub fn new(
        compose: ComposeCommand,
        compose_file: String,
        command_timeout: Duration,
        build_timeout: Duration,
    ) -> Self {
        Self {
            compose,
            compose_file,
            work_dir: PathBuf::from("."),
            command_timeout,
            build_timeout,
        }
    }

    /// 执行短 docker 命令并检查退出状态
    async fn run_docker(&self, args: &[&str]) -> Result<std::process::Output, RuntimeError> {
        debug!(args = ?args, "docker");
        let output = CommandRunner::run_simple("docker", args, self.command_timeout)
            .await
            .map_err(|e| RuntimeError::CommandFailed {
                command: format!("docker {}", args.join(" ")),
                stderr: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // 容器/卷不存在单独建模，调用方可以按"已不存在"处理
        if stderr.contains("No such container")
            || stderr.contains("No such volume")
            || stderr.contains("no such volume")
        {
            let subject = args.last().copied().unwrap_or_default().to_string();
            return Err(RuntimeError::NotFound(subject));
        }

        Err(RuntimeError::CommandFailed {
            command: format!("docker {}", args.join(" ")),
            stderr,
        })
    }

    /// 执行 compose 子命令，输出实时转发
    async fn run_compose(&self, sub: &[&str]) -> Result<(), RuntimeError> {
        let mut args: Vec<&str> = self.compose.prefix.clone();
        args.extend(["-f", self.compose_file.as_str()]);
        args.extend_from_slice(sub);

        debug!(program = self.compose.program, args = ?args, "compose");
        let result = CommandRunner::run_with_streaming(
            self.compose.program,
            &args,
            &self.work_dir,
            CancellationToken::new(),
            self.build_timeout,
        )
        .await
        .map_err(|e| RuntimeError::CommandFailed {
            command: format!("{} {}", self.compose.program, args.join(" ")),
            stderr: e.to_string(),
        })?;

        if result.timed_out {
            return Err(RuntimeError::CommandFailed {
                command: format!("{} {}", self.compose.program, args.join(" ")),
                stderr: "timed out".to_string(),
            });
        }
        if !result.status.success() {
            return Err(RuntimeError::CommandFailed {
                command: format!("{} {}", self.compose.program, args.join(" ")),
                stderr: format!("exit code {}", result.status.code().unwrap_or(-1)),
            });
        }
        Ok(())
    }
}

/// 解析 `docker ps --format` 的一行输出
fn parse_ps_line(line: &str) -> Option<ContainerStatus> {
    if line.is_empty() {
        return None;
    }
    let parts: Vec<&str> = line.split('|').collect();
    Some(ContainerStatus {
        name: parts.first()?.to_string(),
        state: parts.get(1).unwrap_or(&"").to_string(),
        status: parts.get(2).unwrap_or(&"").to_string(),
    })
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn ps(&self) -> Result<Vec<ContainerStatus>, RuntimeError> {
        let output = self
            .run_docker(&[
                "ps",
                "-a",
                "--format",
                "{{.Names}}|{{.State}}|{{.Status}}",
            ])
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter_map(parse_ps_line).collect())
    }

    async fn build(&self, target: &str) -> Result<(), RuntimeError> {
        self.run_compose(&["build", target]).await
    }

    async fn up(&self, service: &str) -> Result<(), RuntimeError> {
        self.run_compose(&["up", "-d", service]).await
    }

    async fn stop(&self, container: &str) -> Result<(), RuntimeError> {
        self.run_docker(&["stop", container]).await.map(|_| ())
    }

    async fn rm(&self, container: &str) -> Result<(), RuntimeError> {
        self.run_docker(&["rm", container]).await.map(|_| ())
    }

    async fn cp(&self, local: &str, container: &str, remote: &str) -> Result<(), RuntimeError> {
        let dest = format!("{}:{}", container, remote);
        self.run_docker(&["cp", local, &dest]).await.map(|_| ())
    }

    async fn restart(&self, container: &str) -> Result<(), RuntimeError> {
        self.run_docker(&["restart", container]).await.map(|_| ())
    }

    async fn volume_rm(&self, volume: &str) -> Result<(), RuntimeError> {
        self.run_docker(&["volume", "rm", volume]).await.map(|_| ())
    }
}
