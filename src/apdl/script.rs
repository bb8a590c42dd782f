//! # 内置执行器
//!
//! - `CommandLog`: 在内存中记录命令及选项（试运行、测试）
//! - `ScriptWriter`: 把命令逐行写入 APDL 输入脚本 (`.inp`)
//!
//! ## 依赖关系
//! - 实现 `apdl/mod.rs` 中的 `Run`
//! - 被 `commands/mesh.rs` 使用

use super::{Run, RunOptions};

use std::convert::Infallible;
use std::io::{self, Write};

/// 内存命令记录器
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<(String, RunOptions)>,
    response: String,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次执行都返回固定响应
    pub fn with_response(response: &str) -> Self {
        CommandLog {
            entries: Vec::new(),
            response: response.to_string(),
        }
    }

    /// 已记录的命令及其选项
    pub fn entries(&self) -> &[(String, RunOptions)] {
        &self.entries
    }

    /// 已记录的命令行
    pub fn commands(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }
}

impl Run for CommandLog {
    type Output = String;
    type Error = Infallible;

    fn run(&mut self, command: &str, opts: RunOptions) -> Result<String, Infallible> {
        self.entries.push((command.to_string(), opts));
        Ok(self.response.clone())
    }
}

/// APDL 脚本写入器
///
/// 每条命令写为一行；`mute` 不影响写入。
pub struct ScriptWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(out: W) -> Self {
        ScriptWriter { out, written: 0 }
    }

    /// 已写入的命令数
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Run for ScriptWriter<W> {
    type Output = ();
    type Error = io::Error;

    fn run(&mut self, command: &str, opts: RunOptions) -> io::Result<()> {
        writeln!(self.out, "{}", command)?;
        self.out.flush()?;
        self.written += 1;
        if opts.verbose {
            log::debug!("wrote '{}'", command);
        }
        Ok(())
    }
}
