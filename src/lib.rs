//! 终端猜国旗小游戏
//!
//! - `models`: 会话状态机，与渲染无关
//! - `ui`: 基于 ratatui 的终端渲染层，只读取快照并转发用户意图
//! - `config`: TOML 配置加载

pub mod config;
pub mod error;
pub mod models;
pub mod ui;
