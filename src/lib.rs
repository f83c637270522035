//! WatchVine Deploy Orchestrator - 手表系统部署编排器
//!
//! 读取声明式服务清单，对容器运行时执行生命周期操作
//! （构建、按依赖顺序启动、停止、移除、拷贝文件、重启），
//! 轮询健康端点并输出结构化的成功/失败汇总

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod report;
pub mod services;

#[cfg(test)]
pub mod test_support;
