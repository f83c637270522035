//! 清理目标领域模型

use serde::{Deserialize, Serialize};

/// 清理目标类型
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupKind {
    /// 临时目录：清空后重建
    Directory,
    /// 命名卷：通过运行时删除
    Volume,
    /// 容器：stop + rm
    Container,
    /// 日志文件：加时间戳后缀归档，不直接删除
    LogFile,
}

impl CleanupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupKind::Directory => "directory",
            CleanupKind::Volume => "volume",
            CleanupKind::Container => "container",
            CleanupKind::LogFile => "log_file",
        }
    }
}

/// 清理目标
///
/// `destructive = true`（如主数据库卷）的目标只有在显式授权后才会被触碰
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CleanupTarget {
    pub kind: CleanupKind,
    /// 路径、卷名或容器名
    pub id: String,
    #[serde(default)]
    pub destructive: bool,
}

impl CleanupTarget {
    pub fn new(kind: CleanupKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            destructive: false,
        }
    }

    pub fn destructive(kind: CleanupKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            destructive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(CleanupKind::Directory.as_str(), "directory");
        assert_eq!(CleanupKind::LogFile.as_str(), "log_file");
    }

    #[test]
    fn test_target_from_yaml_defaults_non_destructive() {
        let yaml = "kind: volume\nid: watch_mongo_data\n";
        let target: CleanupTarget = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(target.kind, CleanupKind::Volume);
        assert!(!target.destructive);

        let yaml = "kind: volume\nid: watch_mongo_data\ndestructive: true\n";
        let target: CleanupTarget = serde_yaml::from_str(yaml).unwrap();
        assert!(target.destructive);
    }
}
