//! 基础设施模块
//!
//! 封装外部依赖（命令执行、docker CLI 驱动）

pub mod command;
pub mod docker;

pub use command::CommandRunner;
pub use docker::{detect_compose_command, ComposeCommand, DockerCli};
