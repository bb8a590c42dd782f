//! # submit 子命令 CLI 定义
//!
//! 向 HPS 集群提交 Python/Shell 作业
//!
//! 长选项沿用下划线写法 (`--num_cores`)，同时接受连字符别名。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use crate::hpc::config::SettingOverrides;
use crate::hpc::helper::DEFAULT_HELPER;
use crate::hpc::DEFAULT_POLL_INTERVAL;

use clap::{ArgAction, Args};
use std::path::PathBuf;

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Main file to run on the cluster (Python or shell script)
    pub main_file: PathBuf,

    /// Name of the HPS project to be created
    #[arg(long)]
    pub name: Option<String>,

    /// URL where the HPS cluster is deployed (e.g. "https://myserver:3000/hps")
    #[arg(long)]
    pub url: Option<String>,

    /// Username to log into the HPC cluster
    #[arg(long)]
    pub user: Option<String>,

    /// Password used to log into the HPC cluster
    #[arg(long)]
    pub password: Option<String>,

    /// Python version used to create the virtual environment (default: python3 on the cluster)
    #[arg(long)]
    pub python: Option<String>,

    /// Output files to be monitored (comma-separated)
    #[arg(long = "output_files", alias = "output-files")]
    pub output_files: Option<String>,

    /// Shell script to execute instead of the main file
    #[arg(long = "shell_file", alias = "shell-file")]
    pub shell_file: Option<PathBuf>,

    /// Requirements file used to populate the remote virtual environment
    #[arg(long = "requirements_file", alias = "requirements-file")]
    pub requirements_file: Option<PathBuf>,

    /// Extra files to upload alongside the main file (comma-separated)
    #[arg(long = "extra_files", alias = "extra-files")]
    pub extra_files: Option<String>,

    /// JSON file to load the job configuration from [default: ./hps_config.json]
    #[arg(long = "config_file", alias = "config-file")]
    pub config_file: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────
    // Resource options
    // ─────────────────────────────────────────────────────────────
    /// Number of CPU cores [default: 1]
    #[arg(long = "num_cores", alias = "num-cores")]
    pub num_cores: Option<u32>,

    /// Memory in MB [default: 100]
    #[arg(long)]
    pub memory: Option<u64>,

    /// Disk space in MB [default: 100]
    #[arg(long = "disk_space", alias = "disk-space")]
    pub disk_space: Option<u64>,

    /// Request exclusive use of the execution node [default: false]
    #[arg(long, action = ArgAction::Set)]
    pub exclusive: Option<bool>,

    /// Maximum execution time in seconds [default: 1000]
    #[arg(long = "max_execution_time", alias = "max-execution-time")]
    pub max_execution_time: Option<u64>,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Block until the job is evaluated or failed
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub wait: bool,

    /// Write the resolved configuration to the config file after a successful submission (overwrites it)
    #[arg(
        long = "save_config_file",
        alias = "save-config-file",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub save_config_file: bool,

    /// Submission helper program (may include leading arguments)
    #[arg(long, env = "APDLKIT_HPS_HELPER", default_value = DEFAULT_HELPER)]
    pub helper: String,

    /// Seconds between status checks while waiting
    #[arg(long = "poll_interval", alias = "poll-interval", default_value_t = DEFAULT_POLL_INTERVAL)]
    pub poll_interval: u64,
}

impl SubmitArgs {
    /// 命令行给出的配置项
    pub fn overrides(&self) -> SettingOverrides {
        SettingOverrides {
            url: self.url.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            python: self.python.clone(),
            name: self.name.clone(),
            num_cores: self.num_cores,
            memory: self.memory,
            disk_space: self.disk_space,
            exclusive: self.exclusive,
            max_execution_time: self.max_execution_time,
        }
    }
}
