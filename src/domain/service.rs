//! 服务相关领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 健康检查配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// 探测地址（如 http://localhost:8001/health）
    pub url: String,
    /// 整体轮询超时（秒）
    #[serde(default = "default_health_timeout")]
    pub timeout_seconds: u64,
}

fn default_health_timeout() -> u64 {
    60
}

/// 服务规格
///
/// 容器名是显式字段，不做任何运行时字符串变换
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// 逻辑服务名（清单内唯一）
    pub name: String,
    /// 容器名（如 watch_text_search_api）
    pub container: String,
    /// compose build 目标，未设置则不构建
    #[serde(default)]
    pub build: Option<String>,
    /// 启动顺序依赖（服务名）
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// 健康检查，未设置则只看容器状态
    #[serde(default)]
    pub health: Option<HealthCheck>,
    /// 外部托管服务，编排器永不 stop/rm
    #[serde(default)]
    pub preserve: bool,
    /// 长耗时后台任务：启动后不等待、不做健康检查
    #[serde(default)]
    pub detached: bool,
    /// 新启动后的固定预热等待（秒），之后才开始健康轮询
    #[serde(default)]
    pub warmup_seconds: u64,
}

/// 单项运行结果
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// 容器在运行（健康检查通过或无健康检查）
    Running,
    /// 健康检查在超时窗口内未通过
    Unhealthy,
    /// 容器不存在
    Missing,
    /// preserve 服务，未做任何操作
    Preserved,
    /// 后台任务已启动（不等待完成）
    Detached,
    /// 容器已停止并移除
    Removed,
    /// 日志文件已归档
    Archived,
    /// 目录已清空重建
    Recreated,
    /// 文件已复制进容器
    Copied,
    /// 无需处理（目标本就不存在）
    Skipped,
    /// 非致命警告（如本地文件缺失）
    Warning,
    /// 操作失败（非致命，其余条目继续）
    Failed,
}

impl Outcome {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Running => "running",
            Outcome::Unhealthy => "unhealthy",
            Outcome::Missing => "missing",
            Outcome::Preserved => "preserved",
            Outcome::Detached => "detached",
            Outcome::Removed => "removed",
            Outcome::Archived => "archived",
            Outcome::Recreated => "recreated",
            Outcome::Copied => "copied",
            Outcome::Skipped => "skipped",
            Outcome::Warning => "warning",
            Outcome::Failed => "failed",
        }
    }

    /// 是否让整次运行降级
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Outcome::Unhealthy | Outcome::Missing | Outcome::Warning | Outcome::Failed
        )
    }
}

/// 运行报告条目
#[derive(Clone, Debug, Serialize)]
pub struct ReportEntry {
    /// 服务名或清理目标标识
    pub name: String,
    pub outcome: Outcome,
    /// 补充信息（如 "healthy after 4 attempts"）
    pub detail: String,
}

impl ReportEntry {
    pub fn new(name: impl Into<String>, outcome: Outcome, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome,
            detail: detail.into(),
        }
    }
}

/// 一次编排操作的运行报告
///
/// 纯输出值：打印后即丢弃，编排器自身不做持久化
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// 操作名（deploy / teardown / copy-files / cleanup / status）
    pub operation: String,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// 创建空报告
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// 追加一条结果
    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// 是否有降级条目
    pub fn is_degraded(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.is_degraded())
    }

    /// 降级条目数量
    pub fn degraded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_degraded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_as_str() {
        assert_eq!(Outcome::Running.as_str(), "running");
        assert_eq!(Outcome::Unhealthy.as_str(), "unhealthy");
        assert_eq!(Outcome::Preserved.as_str(), "preserved");
    }

    #[test]
    fn test_outcome_degraded() {
        assert!(!Outcome::Running.is_degraded());
        assert!(!Outcome::Preserved.is_degraded());
        assert!(!Outcome::Detached.is_degraded());
        assert!(Outcome::Unhealthy.is_degraded());
        assert!(Outcome::Warning.is_degraded());
        assert!(Outcome::Failed.is_degraded());
    }

    #[test]
    fn test_report_degraded_count() {
        let mut report = RunReport::new("deploy");
        report.push(ReportEntry::new("db", Outcome::Running, "already running"));
        assert!(!report.is_degraded());

        report.push(ReportEntry::new("app", Outcome::Unhealthy, "timed out"));
        report.push(ReportEntry::new("search", Outcome::Failed, "compose up failed"));
        assert!(report.is_degraded());
        assert_eq!(report.degraded_count(), 2);
    }

    #[test]
    fn test_service_spec_defaults_from_yaml() {
        let yaml = "name: mongodb\ncontainer: watch_mongodb\n";
        let parsed: ServiceSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.name, "mongodb");
        assert!(parsed.depends_on.is_empty());
        assert!(parsed.health.is_none());
        assert!(!parsed.preserve);
        assert!(!parsed.detached);
        assert_eq!(parsed.warmup_seconds, 0);
    }
}
