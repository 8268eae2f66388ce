//! 错误类型定义
//!
//! - `InvalidInput`: 调用方违反会话契约（越界下标、错误阶段）
//! - `SetupError`: 构造会话时的参数校验失败
//! - `ConfigError`: 读取/解析配置文件失败
//! - `AppError`: 程序顶层错误

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Phase;

/// 会话操作被拒绝，状态保持不变
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("选项下标 {index} 超出范围 (0..=2)")]
    OptionOutOfRange { index: usize },
    #[error("当前阶段 {phase} 不允许执行 {operation}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("国家池至少需要 3 个国家，当前只有 {len} 个")]
    PoolTooSmall { len: usize },
    #[error("国家池中存在重复项: {0}")]
    DuplicateCountry(String),
    #[error("国家池中存在空的国家标识")]
    EmptyCountry,
    #[error("总回合数必须大于 0")]
    NoRounds,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("配置文件 {path} 格式错误: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("无法获取用户配置目录")]
    NoConfigDir,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
