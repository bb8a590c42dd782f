//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `submit`: 向 HPS 集群提交作业
//! - `mesh`: APDL 网格划分命令（嵌套子命令）
//!   - `list`: 列出可用命令及其字段
//!   - `emit`: 渲染一条命令，打印或追加到脚本
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: mesh, submit

pub mod mesh;
pub mod submit;

use clap::{Parser, Subcommand};

/// apdlkit - APDL 网格命令与 HPS 作业提交工具
#[derive(Parser)]
#[command(name = "apdlkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Typed APDL meshing commands and HPS job submission", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Submit jobs to an HPC cluster using an HPS submission helper
    Submit(submit::SubmitArgs),

    /// Build APDL meshing commands
    Mesh(mesh::MeshArgs),
}
