//! # mesh 命令实现
//!
//! ## 功能
//! - `list`: 以表格形式列出网格划分命令
//! - `emit`: 渲染一条命令，打印到 stdout 或追加到 APDL 脚本
//!
//! ## 依赖关系
//! - 使用 `cli/mesh.rs` 定义的参数
//! - 使用 `apdl/`, `utils/output.rs`

use crate::apdl::{self, CommandSpec, Run, RunOptions, ScriptWriter, MESHING};
use crate::cli::mesh::{EmitArgs, ListArgs, MeshArgs, MeshCommands};
use crate::error::{ApdlkitError, Result};
use crate::utils::output;

use std::fs::OpenOptions;
use tabled::{Table, Tabled};

/// 命令表的一行
#[derive(Debug, Clone, Tabled)]
struct CommandRow {
    #[tabled(rename = "Method")]
    method: &'static str,
    #[tabled(rename = "Opcode")]
    opcode: &'static str,
    #[tabled(rename = "Fields")]
    fields: String,
}

impl From<&CommandSpec> for CommandRow {
    fn from(spec: &CommandSpec) -> Self {
        let fields = spec
            .slots
            .iter()
            .map(|s| if s.is_empty() { "(blank)" } else { *s })
            .collect::<Vec<_>>()
            .join(", ");
        CommandRow {
            method: spec.name,
            opcode: spec.opcode,
            fields,
        }
    }
}

/// 执行 mesh 命令
pub fn execute(args: MeshArgs) -> Result<()> {
    match args.command {
        MeshCommands::List(args) => list(args),
        MeshCommands::Emit(args) => emit(args),
    }
}

fn list(args: ListArgs) -> Result<()> {
    let rows = filter_commands(args.filter.as_deref())
        .map(CommandRow::from)
        .collect::<Vec<_>>();

    if rows.is_empty() {
        output::print_warning("No meshing command matches the filter");
        return Ok(());
    }

    println!("{}", Table::new(&rows));
    output::print_info(&format!("{} of {} commands", rows.len(), MESHING.len()));
    Ok(())
}

fn filter_commands(filter: Option<&str>) -> impl Iterator<Item = &'static CommandSpec> {
    let needle = filter.map(|f| f.to_ascii_lowercase());
    MESHING.iter().filter(move |spec| match &needle {
        Some(n) => {
            spec.name.contains(n.as_str()) || spec.opcode.to_ascii_lowercase().contains(n.as_str())
        }
        None => true,
    })
}

fn emit(args: EmitArgs) -> Result<()> {
    let spec = apdl::find_command(&args.command)?;
    let values = args
        .params
        .iter()
        .map(|raw| apdl::parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;
    let line = spec.render(&values)?;

    match &args.script {
        None => println!("{}", line),
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ApdlkitError::FileWriteError {
                    path: path.display().to_string(),
                    source: e,
                })?;

            let mut writer = ScriptWriter::new(file);
            writer
                .run(&line, RunOptions::default())
                .map_err(|e| ApdlkitError::FileWriteError {
                    path: path.display().to_string(),
                    source: e,
                })?;
            output::print_success(&format!("{} -> {}", line, path.display()));
        }
    }

    Ok(())
}
