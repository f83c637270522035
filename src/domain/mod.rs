//! 领域模型模块
//!
//! 纯数据结构与运行时抽象，不含执行逻辑

pub mod cleanup;
pub mod plan;
pub mod runtime;
pub mod service;

// Re-exports for convenience
pub use cleanup::{CleanupKind, CleanupTarget};
pub use plan::DeploymentPlan;
pub use runtime::{ContainerRuntime, ContainerStatus, RuntimeError};
pub use service::{HealthCheck, Outcome, ReportEntry, RunReport, ServiceSpec};
