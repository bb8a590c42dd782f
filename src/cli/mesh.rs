//! # mesh 子命令 CLI 定义
//!
//! 渲染 APDL 网格划分命令：
//! - `list`: 列出命令表
//! - `emit`: 按 `key=value` 渲染一条命令
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/mesh.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// mesh 主命令参数
#[derive(Args, Debug)]
pub struct MeshArgs {
    #[command(subcommand)]
    pub command: MeshCommands,
}

/// mesh 子命令
#[derive(Subcommand, Debug)]
pub enum MeshCommands {
    /// List the available meshing commands and their fields
    List(ListArgs),

    /// Render one meshing command (e.g. `emit vmesh nv1=ALL`)
    Emit(EmitArgs),
}

/// list 子命令参数
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show commands whose name or opcode contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

/// emit 子命令参数
#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Method name or opcode (e.g. `vmesh` or `VMESH`)
    pub command: String,

    /// Field values as KEY=VALUE; omitted fields are left empty
    pub params: Vec<String>,

    /// Append the command to this APDL input script instead of printing it
    #[arg(long)]
    pub script: Option<PathBuf>,
}
