//! 统一错误处理
//!
//! 只有致命错误出现在这里（运行时不可达、依赖环、缺少确认等），
//! 单个服务的健康检查失败等非致命问题记录在 `RunReport` 中，不走错误路径

use thiserror::Error;

/// 编排器致命错误
///
/// 任何一个变体都会中止当前操作并以非零退出码结束进程
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// 容器运行时不可达（docker 未安装或 daemon 未启动）
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// 服务依赖存在环，配置错误
    #[error("cyclic dependency detected involving service '{0}'")]
    CyclicDependency(String),

    /// 破坏性清理需要显式确认
    #[error("destructive cleanup requires confirmation (re-run with --full --yes or answer 'yes')")]
    ConfirmationRequired,

    /// 配置清单无效
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// 配置清单读取/解析失败
    #[error("failed to load manifest {path}: {reason}")]
    ManifestLoad { path: String, reason: String },

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 便捷类型别名
pub type Result<T> = std::result::Result<T, OrchestratorError>;
