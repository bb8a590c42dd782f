//! # apdlkit 命令行入口
//!
//! ## 子命令
//! - `submit` - 向 HPS 集群提交作业
//! - `mesh`   - 渲染 APDL 网格划分命令
//!   - `list` - 列出命令表
//!   - `emit` - 渲染一条命令

use apdlkit::cli::Cli;
use apdlkit::{commands, utils};

use clap::Parser;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
