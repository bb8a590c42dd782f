//! # HPS 作业提交
//!
//! 把解析后的配置和待上传文件组装成 `JobRequest`，交给外部后端创建作业，
//! 然后按需保存配置、等待作业结束。
//!
//! ## 功能
//! - `JobBackend`: 外部作业系统接口（创建作业、查询状态）
//! - `submit`: 单次提交流程
//! - `wait_for_completion`: 阻塞轮询，无超时
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 子模块: config, helper

pub mod config;
pub mod helper;

pub use config::{ConfigFile, SettingOverrides, SubmitSettings};
pub use helper::HelperBackend;

use crate::error::{ApdlkitError, Result};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 默认轮询间隔（秒）
pub const DEFAULT_POLL_INTERVAL: u64 = 5;

// ─────────────────────────────────────────────────────────────
// 作业描述
// ─────────────────────────────────────────────────────────────

/// 提交给后端的作业描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub main_file: PathBuf,
    pub name: String,
    pub url: String,
    pub user: String,
    pub password: String,
    pub python: String,
    pub output_files: Vec<String>,
    pub shell_file: Option<PathBuf>,
    pub requirements_file: Option<PathBuf>,
    pub extra_files: Vec<PathBuf>,
    pub config_file: PathBuf,
    pub num_cores: u32,
    pub memory: u64,
    pub disk_space: u64,
    pub exclusive: bool,
    pub max_execution_time: u64,
}

/// 随作业上传的文件
#[derive(Debug, Clone, Default)]
pub struct JobFiles {
    pub main_file: PathBuf,
    pub output_files: Vec<String>,
    pub shell_file: Option<PathBuf>,
    pub requirements_file: Option<PathBuf>,
    pub extra_files: Vec<PathBuf>,
}

impl JobRequest {
    /// 组装作业描述，并检查本地文件是否存在
    pub fn new(files: JobFiles, settings: &SubmitSettings, config_file: &Path) -> Result<Self> {
        ensure_exists(&files.main_file)?;
        for path in files
            .shell_file
            .iter()
            .chain(files.requirements_file.iter())
            .chain(files.extra_files.iter())
        {
            ensure_exists(path)?;
        }

        Ok(JobRequest {
            main_file: files.main_file,
            name: settings.name.clone(),
            url: settings.url.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            python: settings.python.clone(),
            output_files: files.output_files,
            shell_file: files.shell_file,
            requirements_file: files.requirements_file,
            extra_files: files.extra_files,
            config_file: config_file.to_path_buf(),
            num_cores: settings.num_cores,
            memory: settings.memory,
            disk_space: settings.disk_space,
            exclusive: settings.exclusive,
            max_execution_time: settings.max_execution_time,
        })
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ApdlkitError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// 拆分逗号分隔的文件列表
pub fn split_file_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────
// 作业状态
// ─────────────────────────────────────────────────────────────

/// 作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Inactive,
    Pending,
    Prolog,
    Running,
    Evaluated,
    Failed,
    Aborted,
    Timeout,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Inactive => "inactive",
            JobStatus::Pending => "pending",
            JobStatus::Prolog => "prolog",
            JobStatus::Running => "running",
            JobStatus::Evaluated => "evaluated",
            JobStatus::Failed => "failed",
            JobStatus::Aborted => "aborted",
            JobStatus::Timeout => "timeout",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inactive" => Ok(JobStatus::Inactive),
            "pending" => Ok(JobStatus::Pending),
            "prolog" => Ok(JobStatus::Prolog),
            "running" => Ok(JobStatus::Running),
            "evaluated" => Ok(JobStatus::Evaluated),
            "failed" => Ok(JobStatus::Failed),
            "aborted" => Ok(JobStatus::Aborted),
            "timeout" => Ok(JobStatus::Timeout),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

/// 等待结束的目标状态
pub const WAIT_FOR: [JobStatus; 2] = [JobStatus::Evaluated, JobStatus::Failed];

// ─────────────────────────────────────────────────────────────
// 后端接口与提交流程
// ─────────────────────────────────────────────────────────────

/// 外部作业系统
///
/// 创建、认证、上传与调度都由后端负责，这里不做重试也不转换错误。
pub trait JobBackend {
    type Handle: fmt::Display;

    fn create_job(&self, request: &JobRequest) -> Result<Self::Handle>;

    fn job_status(&self, handle: &Self::Handle) -> Result<JobStatus>;
}

/// 提交流程选项
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub config_file: PathBuf,
    pub save_config_file: bool,
    pub wait: bool,
    pub poll_interval: Duration,
}

/// 提交作业
///
/// 作业创建成功后才写回配置；`wait` 时阻塞到作业进入 `WAIT_FOR` 中的状态。
pub fn submit<B: JobBackend>(
    backend: &B,
    request: &JobRequest,
    settings: &SubmitSettings,
    opts: &SubmitOptions,
) -> Result<B::Handle> {
    log::info!("Submitting '{}' to {}", request.name, request.url);
    let handle = backend.create_job(request)?;
    log::info!("Created project {}", handle);

    if opts.save_config_file {
        settings.save(&opts.config_file)?;
    }

    if opts.wait {
        log::info!("Waiting for project {} to be completed...", request.name);
        wait_for_completion(backend, &handle, &WAIT_FOR, opts.poll_interval, |_| {})?;
    }

    Ok(handle)
}

/// 轮询直到状态落入 `targets`，返回最终状态
///
/// 没有超时；`on_poll` 在每次查询后调用。
pub fn wait_for_completion<B, F>(
    backend: &B,
    handle: &B::Handle,
    targets: &[JobStatus],
    interval: Duration,
    mut on_poll: F,
) -> Result<JobStatus>
where
    B: JobBackend,
    F: FnMut(JobStatus),
{
    loop {
        let status = backend.job_status(handle)?;
        log::debug!("Project {} is {}", handle, status);
        on_poll(status);
        if targets.contains(&status) {
            return Ok(status);
        }
        std::thread::sleep(interval);
    }
}
