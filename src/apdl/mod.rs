//! # APDL 命令格式化核心
//!
//! 把参数按固定顺序拼成 `OPCODE,p1,p2,...,pn` 形式的命令行，
//! 再交给外部注入的执行器 (`Run`) 执行。
//!
//! ## 功能
//! - `Run`: 执行器接口（远程求解器、脚本文件、内存记录……）
//! - `Arg`: 单个位置参数，默认为空字段
//! - `RunOptions`: 原样透传给执行器的选项
//! - `CommandSpec`: 运行时命令描述，供 CLI 使用
//!
//! ## 依赖关系
//! - 被 `commands/mesh.rs` 使用
//! - 子模块: meshing, script

pub mod meshing;
pub mod script;

pub use meshing::{Meshing, MESHING};
pub use script::{CommandLog, ScriptWriter};

use crate::error::{ApdlkitError, Result};

use std::collections::BTreeMap;
use std::fmt;

/// 拼接命令行
///
/// 空参数保留为连续的逗号，以保持位置语义。
pub fn format_command(opcode: &str, fields: &[&str]) -> String {
    let mut line = String::from(opcode);
    for field in fields {
        line.push(',');
        line.push_str(field);
    }
    line
}

// ─────────────────────────────────────────────────────────────
// 参数值
// ─────────────────────────────────────────────────────────────

/// 单个位置参数
///
/// 默认值是空字符串，表示"省略，使用协议默认值"。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arg(String);

impl Arg {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg(value.clone())
    }
}

/// 浮点数保留小数点 (`1.0` -> `"1.0"`)，指数带符号且至少两位 (`1e+20`, `1e-07`)
impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg(format_float(value))
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

macro_rules! impl_arg_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg(value.to_string())
                }
            }
        )*
    };
}

impl_arg_from_int!(i32, i64, u32, u64, usize);

// ─────────────────────────────────────────────────────────────
// 执行器接口
// ─────────────────────────────────────────────────────────────

/// 透传给执行器的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// 静默执行，不捕获响应
    pub mute: Option<bool>,
    /// 打印响应
    pub verbose: bool,
    /// 写入执行器日志
    pub write_to_log: bool,
    /// 其余任意选项
    pub extra: BTreeMap<String, String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            mute: None,
            verbose: false,
            write_to_log: true,
            extra: BTreeMap::new(),
        }
    }
}

impl RunOptions {
    pub fn muted() -> Self {
        RunOptions {
            mute: Some(true),
            ..Default::default()
        }
    }

    /// 添加一个自定义选项
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// 命令执行器
///
/// 格式化层不做校验、重试或错误转换，执行器的返回值与错误原样传回。
pub trait Run {
    type Output;
    type Error;

    fn run(&mut self, command: &str, opts: RunOptions) -> std::result::Result<Self::Output, Self::Error>;

    /// 渲染并执行一条类型化命令
    fn issue<C: ApdlCommand>(
        &mut self,
        cmd: &C,
        opts: RunOptions,
    ) -> std::result::Result<Self::Output, Self::Error>
    where
        Self: Sized,
    {
        self.run(&cmd.command(), opts)
    }
}

impl<R: Run + ?Sized> Run for &mut R {
    type Output = R::Output;
    type Error = R::Error;

    fn run(&mut self, command: &str, opts: RunOptions) -> std::result::Result<Self::Output, Self::Error> {
        (**self).run(command, opts)
    }
}

/// 类型化的 APDL 命令
pub trait ApdlCommand {
    const OPCODE: &'static str;

    /// 按协议顺序排列的字段
    fn fields(&self) -> Vec<&str>;

    fn command(&self) -> String {
        format_command(Self::OPCODE, &self.fields())
    }
}

// ─────────────────────────────────────────────────────────────
// 运行时命令描述
// ─────────────────────────────────────────────────────────────

/// 命令描述：方法名、操作码与字段名
///
/// 空字段名表示协议中固定为空的位置。
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub opcode: &'static str,
    pub slots: &'static [&'static str],
}

impl CommandSpec {
    /// 可由用户填写的字段
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().copied().filter(|s| !s.is_empty())
    }

    /// 由 `key=value` 对渲染命令行
    pub fn render(&self, values: &[(String, String)]) -> Result<String> {
        for (key, _) in values {
            if !self.params().any(|p| same_param(p, key)) {
                return Err(ApdlkitError::InvalidArgument(format!(
                    "{} has no parameter '{}' (expected one of: {})",
                    self.opcode,
                    key,
                    self.params().collect::<Vec<_>>().join(", ")
                )));
            }
        }

        let fields: Vec<&str> = self
            .slots
            .iter()
            .map(|slot| {
                if slot.is_empty() {
                    return "";
                }
                values
                    .iter()
                    .rev()
                    .find(|(key, _)| same_param(slot, key))
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            })
            .collect();

        Ok(format_command(self.opcode, &fields))
    }
}

/// `type_` 与 `type` 视为同一参数
fn same_param(slot: &str, key: &str) -> bool {
    slot.trim_end_matches('_')
        .eq_ignore_ascii_case(key.trim_end_matches('_'))
}

/// 按方法名或操作码查找命令（不区分大小写）
pub fn find_command(name: &str) -> Result<&'static CommandSpec> {
    MESHING
        .iter()
        .find(|spec| same_param(spec.name, name) || spec.opcode.eq_ignore_ascii_case(name))
        .ok_or_else(|| ApdlkitError::UnknownCommand(name.to_string()))
}

/// 解析 `key=value` 形式的参数
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ApdlkitError::InvalidArgument(format!(
            "expected KEY=VALUE, got '{}'",
            raw
        ))),
    }
}
