//! # submit 命令实现
//!
//! 向 HPS 集群提交作业。
//!
//! ## 功能
//! - 合并命令行、配置文件与默认值
//! - 通过提交助手创建作业
//! - 可选写回配置文件
//! - 可选等待作业结束
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `hpc/`, `utils/output.rs`, `utils/progress.rs`

use crate::cli::submit::SubmitArgs;
use crate::error::Result;
use crate::hpc::config::{self, ConfigFile, SubmitSettings};
use crate::hpc::{self, HelperBackend, JobBackend, JobFiles, JobRequest, JobStatus, SubmitOptions};
use crate::utils::{output, progress};

use std::path::PathBuf;
use std::time::Duration;

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("HPS Job Submission");

    // 确定配置文件路径
    let config_file = match &args.config_file {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    log::debug!("Using config file '{}'", config_file.display());

    // 解析配置
    let file = ConfigFile::load(&config_file)?;
    let settings = SubmitSettings::resolve(args.overrides(), &file)?;
    print_settings(&settings);

    // 组装作业
    let files = JobFiles {
        main_file: args.main_file.clone(),
        output_files: hpc::split_file_list(args.output_files.as_deref()),
        shell_file: args.shell_file.clone(),
        requirements_file: args.requirements_file.clone(),
        extra_files: hpc::split_file_list(args.extra_files.as_deref())
            .into_iter()
            .map(PathBuf::from)
            .collect(),
    };
    let request = JobRequest::new(files, &settings, &config_file)?;

    let backend = HelperBackend::new(&args.helper);
    let opts = SubmitOptions {
        config_file: config_file.clone(),
        save_config_file: args.save_config_file,
        // 等待在下面带 spinner 进行
        wait: false,
        poll_interval: Duration::from_secs(args.poll_interval),
    };

    let project = hpc::submit(&backend, &request, &settings, &opts)?;
    output::print_success(&format!("Submitted '{}' as project {}", settings.name, project));

    if args.save_config_file {
        output::print_info(&format!("Configuration written to '{}'", config_file.display()));
    }

    if args.wait {
        let status = wait_with_spinner(&backend, &project, &settings.name, opts.poll_interval)?;
        output::print_separator();
        match status {
            JobStatus::Evaluated => output::print_done(&format!("Project {} evaluated", project)),
            other => output::print_warning(&format!("Project {} finished as {}", project, other)),
        }
    }

    Ok(())
}

/// 阻塞等待作业结束
fn wait_with_spinner<B: JobBackend>(
    backend: &B,
    project: &B::Handle,
    name: &str,
    interval: Duration,
) -> Result<JobStatus> {
    output::print_info(&format!("Waiting for project {} to be completed...", name));
    let spinner = progress::create_spinner("pending");

    let result = hpc::wait_for_completion(backend, project, &hpc::WAIT_FOR, interval, |status| {
        spinner.set_message(status.to_string());
    });

    spinner.finish_and_clear();
    result
}

/// 打印解析后的配置（密码不显示）
fn print_settings(settings: &SubmitSettings) {
    output::print_setting("name", &settings.name);
    output::print_setting("url", &settings.url);
    output::print_setting("user", &settings.user);
    output::print_setting("python", &settings.python);
    output::print_setting("num_cores", &settings.num_cores.to_string());
    output::print_setting("memory (MB)", &settings.memory.to_string());
    output::print_setting("disk_space (MB)", &settings.disk_space.to_string());
    output::print_setting("exclusive", &settings.exclusive.to_string());
    output::print_setting(
        "max_execution_time (s)",
        &settings.max_execution_time.to_string(),
    );
    println!();
}
