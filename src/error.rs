//! # 统一错误处理模块
//!
//! 定义 apdlkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! 命令格式化层本身不产生错误：`Run` 执行器的错误原样返回给调用者。
//! 这里只覆盖 CLI、配置文件与作业提交流程。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// apdlkit 统一错误类型
#[derive(Error, Debug)]
pub enum ApdlkitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected output from '{command}': {reason}")]
    HelperProtocol { command: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数与配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown APDL command: {0}")]
    UnknownCommand(String),

    #[error("'{key}' is not given through the CLI or the config file")]
    MissingSetting { key: String },

    #[error("Invalid value for '{key}' in config file: {value}")]
    InvalidSetting { key: String, value: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ApdlkitError>;
