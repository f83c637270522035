//! 容器运行时抽象
//!
//! 编排逻辑只依赖该 trait，真实实现驱动 docker / docker compose CLI，
//! 测试用记录型假实现替换

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 运行时操作错误
///
/// `NotFound` 单独建模：teardown 阶段容器已不存在视为"已拆除"，非错误
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// 容器或卷不存在
    #[error("'{0}' not found")]
    NotFound(String),

    /// 命令以非零状态退出，或根本无法执行（spawn 失败、超时）
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// 容器状态快照（来自 `docker ps -a`）
#[derive(Clone, Debug, Serialize)]
pub struct ContainerStatus {
    pub name: String,
    /// docker 的 state 字段原文：running / exited / created / ...
    pub state: String,
    /// 人类可读状态（如 "Up 3 hours"）
    pub status: String,
}

impl ContainerStatus {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// 容器运行时控制面
///
/// 方法一一对应源脚本用到的 docker 子命令；编排器同一时刻只有一条命令在飞
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// 列出所有容器（含已停止的）
    async fn ps(&self) -> Result<Vec<ContainerStatus>, RuntimeError>;

    /// 构建服务镜像
    async fn build(&self, target: &str) -> Result<(), RuntimeError>;

    /// 后台启动服务
    async fn up(&self, service: &str) -> Result<(), RuntimeError>;

    /// 停止容器
    async fn stop(&self, container: &str) -> Result<(), RuntimeError>;

    /// 移除容器
    async fn rm(&self, container: &str) -> Result<(), RuntimeError>;

    /// 复制本地文件进容器
    async fn cp(&self, local: &str, container: &str, remote: &str) -> Result<(), RuntimeError>;

    /// 重启容器
    async fn restart(&self, container: &str) -> Result<(), RuntimeError>;

    /// 删除命名卷
    async fn volume_rm(&self, volume: &str) -> Result<(), RuntimeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_status_is_running() {
        let status = ContainerStatus {
            name: "watch_mongodb".to_string(),
            state: "running".to_string(),
            status: "Up 2 hours".to_string(),
        };
        assert!(status.is_running());

        let status = ContainerStatus {
            name: "watch_indexer".to_string(),
            state: "exited".to_string(),
            status: "Exited (0) 5 minutes ago".to_string(),
        };
        assert!(!status.is_running());
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::NotFound("watch_app".to_string());
        assert!(err.to_string().contains("watch_app"));

        let err = RuntimeError::CommandFailed {
            command: "docker stop watch_app".to_string(),
            stderr: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("permission denied"));
    }
}
