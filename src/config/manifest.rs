//! 部署清单
//!
//! 声明式 YAML 清单：服务列表、拷贝文件列表、清理目标。
//! 一次调用加载一次，之后不再变化；不做任何网络拉取

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::cleanup::CleanupTarget;
use crate::domain::service::ServiceSpec;
use crate::error::{OrchestratorError, Result};

/// 需要拷贝进容器的文件
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// 本地路径
    pub local: String,
    /// 容器内目标路径
    pub remote: String,
}

/// 部署清单
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// compose 文件路径
    #[serde(default = "default_compose_file")]
    pub compose_file: String,
    /// 服务列表（启动顺序由 depends_on 决定，书写顺序仅作稳定排序参考）
    pub services: Vec<ServiceSpec>,
    /// copy-files 的文件列表
    #[serde(default)]
    pub artifacts: Vec<ArtifactFile>,
    /// cleanup 的目标列表
    #[serde(default)]
    pub cleanup: Vec<CleanupTarget>,
}

fn default_compose_file() -> String {
    "docker-compose.watch_system.yml".to_string()
}

impl Manifest {
    /// 从 YAML 文件加载并校验
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OrchestratorError::ManifestLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let manifest = Self::parse(&content).map_err(|e| OrchestratorError::ManifestLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// 解析 YAML 字符串
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// 结构校验：服务名唯一、依赖引用存在
    pub fn validate(&self) -> Result<()> {
        if self.services.is_empty() {
            return Err(OrchestratorError::Manifest(
                "manifest declares no services".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for svc in &self.services {
            if !seen.insert(svc.name.as_str()) {
                return Err(OrchestratorError::Manifest(format!(
                    "duplicate service name '{}'",
                    svc.name
                )));
            }
        }

        for svc in &self.services {
            for dep in &svc.depends_on {
                if !seen.contains(dep.as_str()) {
                    return Err(OrchestratorError::Manifest(format!(
                        "service '{}' depends on unknown service '{}'",
                        svc.name, dep
                    )));
                }
            }
        }

        Ok(())
    }

    /// 按服务名查找
    pub fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.name == name)
    }

    /// 按容器名查找服务
    pub fn service_by_container(&self, container: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.container == container)
    }
}
