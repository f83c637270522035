//! Health polling
//!
//! Bounded sleep-and-retry against a service's HTTP health endpoint. Every
//! poll loop carries a hard timeout; a service that never becomes healthy is
//! reported, never waited on forever.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::config::env::constants::PROBE_REQUEST_TIMEOUT_SECS;

/// 健康探测接口
///
/// 真实实现发 HTTP GET，测试用脚本化假实现
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// 单次探测：2xx 视为健康
    async fn check(&self, url: &str) -> bool;
}

/// HTTP 健康探测
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROBE_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "health probe failed");
                false
            }
        }
    }
}

/// 一次轮询的结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollResult {
    pub healthy: bool,
    /// 实际探测次数
    pub attempts: u32,
}

/// 按固定间隔轮询直到健康或超时
///
/// 至少探测一次；当剩余时间不足一个间隔时不再等待，直接判定不健康
pub async fn poll_until_healthy(
    probe: &dyn HealthProbe,
    url: &str,
    timeout: Duration,
    interval: Duration,
) -> PollResult {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if probe.check(url).await {
            return PollResult {
                healthy: true,
                attempts,
            };
        }

        if started.elapsed() + interval > timeout {
            return PollResult {
                healthy: false,
                attempts,
            };
        }
        tokio::time::sleep(interval).await;
    }
}
