//! 测试辅助
//!
//! 记录型假运行时 + 脚本化健康探测，供各服务的单元测试共用

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::runtime::{ContainerRuntime, ContainerStatus, RuntimeError};
use crate::services::health::HealthProbe;

/// 记录每条下发命令的假运行时
///
/// `set_running` / `set_volume` 预置环境；stop/rm/restart 对不存在的
/// 容器返回 `NotFound`，与真实 docker CLI 的行为一致
pub struct RecordingRuntime {
    commands: Mutex<Vec<String>>,
    running: Mutex<HashSet<String>>,
    volumes: Mutex<HashSet<String>>,
    fail_up: Mutex<Option<String>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            running: Mutex::new(HashSet::new()),
            volumes: Mutex::new(HashSet::new()),
            fail_up: Mutex::new(None),
        }
    }

    /// 预置一个运行中的容器
    pub fn set_running(&self, container: &str) {
        self.running.lock().unwrap().insert(container.to_string());
    }

    /// 预置一个命名卷
    pub fn set_volume(&self, volume: &str) {
        self.volumes.lock().unwrap().insert(volume.to_string());
    }

    /// 让下一次 up 失败
    pub fn fail_next_up(&self, reason: &str) {
        *self.fail_up.lock().unwrap() = Some(reason.to_string());
    }

    /// 所有下发过的命令
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// 以某前缀开头的命令
    pub fn commands_matching(&self, prefix: &str) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn record(&self, command: String) {
        self.commands.lock().unwrap().push(command);
    }
}

impl Default for RecordingRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for RecordingRuntime {
    async fn ps(&self) -> Result<Vec<ContainerStatus>, RuntimeError> {
        self.record("ps".to_string());
        Ok(self
            .running
            .lock()
            .unwrap()
            .iter()
            .map(|name| ContainerStatus {
                name: name.clone(),
                state: "running".to_string(),
                status: "Up 1 minute".to_string(),
            })
            .collect())
    }

    async fn build(&self, target: &str) -> Result<(), RuntimeError> {
        self.record(format!("build {}", target));
        Ok(())
    }

    async fn up(&self, service: &str) -> Result<(), RuntimeError> {
        self.record(format!("up {}", service));
        if let Some(reason) = self.fail_up.lock().unwrap().take() {
            return Err(RuntimeError::CommandFailed {
                command: format!("up {}", service),
                stderr: reason,
            });
        }
        Ok(())
    }

    async fn stop(&self, container: &str) -> Result<(), RuntimeError> {
        if !self.running.lock().unwrap().contains(container) {
            return Err(RuntimeError::NotFound(container.to_string()));
        }
        self.record(format!("stop {}", container));
        Ok(())
    }

    async fn rm(&self, container: &str) -> Result<(), RuntimeError> {
        if !self.running.lock().unwrap().remove(container) {
            return Err(RuntimeError::NotFound(container.to_string()));
        }
        self.record(format!("rm {}", container));
        Ok(())
    }

    async fn cp(&self, local: &str, container: &str, remote: &str) -> Result<(), RuntimeError> {
        if !self.running.lock().unwrap().contains(container) {
            return Err(RuntimeError::NotFound(container.to_string()));
        }
        self.record(format!("cp {} {}:{}", local, container, remote));
        Ok(())
    }

    async fn restart(&self, container: &str) -> Result<(), RuntimeError> {
        if !self.running.lock().unwrap().contains(container) {
            return Err(RuntimeError::NotFound(container.to_string()));
        }
        self.record(format!("restart {}", container));
        Ok(())
    }

    async fn volume_rm(&self, volume: &str) -> Result<(), RuntimeError> {
        if !self.volumes.lock().unwrap().remove(volume) {
            return Err(RuntimeError::NotFound(volume.to_string()));
        }
        self.record(format!("volume rm {}", volume));
        Ok(())
    }
}

/// 脚本化健康探测
pub struct ScriptedProbe {
    /// 前 N 次返回失败
    failures: u32,
    /// N 次之后的固定结果
    then: bool,
    calls: AtomicU32,
}

impl ScriptedProbe {
    /// 恒定结果
    pub fn always(result: bool) -> Self {
        Self {
            failures: 0,
            then: result,
            calls: AtomicU32::new(0),
        }
    }

    /// 前 n 次失败，之后成功
    pub fn fail_n(n: u32) -> Self {
        Self {
            failures: n,
            then: true,
            calls: AtomicU32::new(0),
        }
    }

    /// 已发生的探测次数
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn check(&self, _url: &str) -> bool {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            false
        } else {
            self.then
        }
    }
}
