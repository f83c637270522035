//! 服务层模块
//!
//! 编排器的核心业务逻辑：preflight、部署、拆除、拷贝、清理、状态

pub mod cleanup;
pub mod copy;
pub mod deploy;
pub mod health;
pub mod preflight;
pub mod status;
pub mod teardown;

pub use deploy::{bring_up, DeployOptions};
pub use health::{HealthProbe, HttpProbe};
pub use preflight::{preflight, CapabilitySet};
