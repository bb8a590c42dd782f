//! # apdlkit - APDL 网格命令与 HPS 作业提交工具
//!
//! 两个互不依赖的部分：
//! - `apdl`: 按固定文本协议拼接网格划分命令，交给注入的执行器 (`Run`)
//! - `hpc`: 合并命令行/配置文件/默认值，通过外部助手提交 HPS 作业
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── apdl/  (命令格式化与执行器)
//!   │     └── hpc/   (配置解析与作业提交)
//!   ├── utils/      (输出、进度、日志)
//!   └── error.rs    (错误处理)
//! ```

pub mod apdl;
pub mod cli;
pub mod commands;
pub mod error;
pub mod hpc;
pub mod utils;
