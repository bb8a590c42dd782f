//! # 日志初始化
//!
//! 进程启动时调用一次；其余模块只通过 `log` 宏写日志。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `env_logger`，`RUST_LOG` 可覆盖默认级别

use env_logger::Env;
use std::io::Write;

/// 初始化全局日志：`[<时间> | <级别>] <消息>`
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} | {}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .init();
}
