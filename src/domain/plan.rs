//! 部署计划
//!
//! 对服务依赖图做拓扑排序，得到一次运行内不可变的启动顺序

use std::collections::HashMap;

use crate::domain::service::ServiceSpec;
use crate::error::{OrchestratorError, Result};

/// 按依赖顺序排列的部署计划
///
/// 一旦计算完成即不可变，`bring_up` 只按此顺序逐个处理
#[derive(Clone, Debug)]
pub struct DeploymentPlan {
    services: Vec<ServiceSpec>,
}

impl DeploymentPlan {
    /// 对服务集合做拓扑排序
    ///
    /// 稳定排序：同层服务保持清单中的书写顺序。
    /// 依赖环返回 `CyclicDependencyError`，引用未知服务同样是配置错误
    pub fn plan(services: Vec<ServiceSpec>) -> Result<Self> {
        let index: HashMap<&str, usize> = services
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i))
            .collect();

        // 校验依赖引用
        for svc in &services {
            for dep in &svc.depends_on {
                if !index.contains_key(dep.as_str()) {
                    return Err(OrchestratorError::Manifest(format!(
                        "service '{}' depends on unknown service '{}'",
                        svc.name, dep
                    )));
                }
            }
        }

        // Kahn 算法，按清单顺序扫描保证稳定性
        let mut in_degree: Vec<usize> = services.iter().map(|s| s.depends_on.len()).collect();
        let mut placed = vec![false; services.len()];
        let mut ordered = Vec::with_capacity(services.len());

        while ordered.len() < services.len() {
            let next = services
                .iter()
                .enumerate()
                .position(|(i, _)| !placed[i] && in_degree[i] == 0);

            let Some(next) = next else {
                // 没有入度为 0 的剩余节点，必然有环；报告环中任意一员
                let member = services
                    .iter()
                    .enumerate()
                    .find(|(i, _)| !placed[*i])
                    .map(|(_, s)| s.name.clone())
                    .unwrap_or_default();
                return Err(OrchestratorError::CyclicDependency(member));
            };

            placed[next] = true;
            let name = services[next].name.clone();
            for (i, svc) in services.iter().enumerate() {
                if !placed[i] && svc.depends_on.iter().any(|d| d == &name) {
                    in_degree[i] -= 1;
                }
            }
            ordered.push(next);
        }

        Ok(Self {
            services: ordered.into_iter().map(|i| services[i].clone()).collect(),
        })
    }

    /// 计划内的服务，按启动顺序
    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// 是否有其他服务依赖该服务（预热等待只对这类服务生效）
    pub fn has_dependents(&self, name: &str) -> bool {
        self.services
            .iter()
            .any(|s| s.depends_on.iter().any(|d| d == name))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
