//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `apdl/`, `hpc/`, `utils/`
//! - 子模块: mesh, submit

pub mod mesh;
pub mod submit;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Submit(args) => submit::execute(args),
        Commands::Mesh(args) => mesh::execute(args),
    }
}
