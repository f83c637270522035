//! 环境变量配置加载

use std::env;

/// 环境配置
///
/// 命令行参数优先，环境变量兜底
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 清单路径（WV_DEPLOY_CONFIG）
    pub manifest_path: Option<String>,
    /// 健康轮询间隔覆盖（毫秒，WV_HEALTH_POLL_INTERVAL_MS）
    pub poll_interval_ms: u64,
    /// 单条外部命令超时覆盖（秒，WV_COMMAND_TIMEOUT_SECS）
    pub command_timeout_secs: u64,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let manifest_path = env::var("WV_DEPLOY_CONFIG").ok().filter(|s| !s.is_empty());

        let poll_interval_ms = env::var("WV_HEALTH_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::HEALTH_POLL_INTERVAL_MS);

        let command_timeout_secs = env::var("WV_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::COMMAND_TIMEOUT_SECS);

        Self {
            manifest_path,
            poll_interval_ms,
            command_timeout_secs,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            poll_interval_ms: constants::HEALTH_POLL_INTERVAL_MS,
            command_timeout_secs: constants::COMMAND_TIMEOUT_SECS,
        }
    }
}

/// 常量
pub mod constants {
    /// 默认清单文件名
    pub const DEFAULT_MANIFEST: &str = "watchvine.yml";

    /// 健康轮询间隔（毫秒）
    pub const HEALTH_POLL_INTERVAL_MS: u64 = 2000;

    /// 单次健康探测的 HTTP 超时（秒）
    pub const PROBE_REQUEST_TIMEOUT_SECS: u64 = 5;

    /// 普通 docker 命令超时（秒）
    pub const COMMAND_TIMEOUT_SECS: u64 = 120;

    /// 镜像构建 / compose up 超时（秒）
    pub const BUILD_TIMEOUT_SECS: u64 = 1800; // 30 分钟

    /// 日志归档后缀时间格式
    pub const ARCHIVE_SUFFIX_FORMAT: &str = "%Y%m%d-%H%M%S";

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
