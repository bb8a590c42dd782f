//! # 外部提交助手后端
//!
//! 通过外部可执行程序与 HPS 集群交互（程序字符串可带前置参数，
//! 如 `python3 hps_helper.py`）：
//! - `<helper> create`: stdin 为 `JobRequest` JSON，stdout 第一行非空内容为项目 ID
//! - `<helper> status`: stdin 为 `{url, user, password, project_id}`，stdout 为状态词
//!
//! ## 依赖关系
//! - 实现 `hpc/mod.rs` 中的 `JobBackend`
//! - 被 `commands/submit.rs` 使用

use super::{JobBackend, JobRequest, JobStatus};
use crate::error::{ApdlkitError, Result};

use serde::Serialize;
use std::fmt;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

/// 默认助手程序名
pub const DEFAULT_HELPER: &str = "hps-submit";

/// 已创建的 HPS 项目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    url: String,
    user: String,
    password: String,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Serialize)]
struct StatusQuery<'a> {
    url: &'a str,
    user: &'a str,
    password: &'a str,
    project_id: &'a str,
}

/// 调用外部助手程序的后端
pub struct HelperBackend {
    program: String,
    leading_args: Vec<String>,
}

impl HelperBackend {
    pub fn new(helper: &str) -> Self {
        let mut parts = helper.split_whitespace().map(str::to_string);
        HelperBackend {
            program: parts.next().unwrap_or_else(|| DEFAULT_HELPER.to_string()),
            leading_args: parts.collect(),
        }
    }

    /// 运行助手子命令，返回 stdout
    fn invoke(&self, action: &str, payload: &str) -> Result<String> {
        let command = format!("{} {}", self.program, action);

        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(action)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ApdlkitError::CommandNotFound {
                    command: self.program.clone(),
                },
                _ => ApdlkitError::CommandFailed {
                    command: command.clone(),
                    stderr: e.to_string(),
                },
            })?;

        // 助手可能不读 stdin 就退出，写入错误只在退出码非零时上报
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(payload.as_bytes()),
            None => Ok(()),
        };

        let out = child
            .wait_with_output()
            .map_err(|e| ApdlkitError::CommandFailed {
                command: command.clone(),
                stderr: e.to_string(),
            })?;

        if !out.status.success() {
            let mut stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            if let Err(e) = write_result {
                if stderr.is_empty() {
                    stderr = format!("writing stdin: {}", e);
                }
            }
            return Err(ApdlkitError::CommandFailed { command, stderr });
        }
        if let Err(e) = write_result {
            log::debug!("{} exited without reading stdin: {}", command, e);
        }

        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

impl JobBackend for HelperBackend {
    type Handle = Project;

    fn create_job(&self, request: &JobRequest) -> Result<Project> {
        let payload = serde_json::to_string(request)?;
        let stdout = self.invoke("create", &payload)?;

        let id = first_line(&stdout).ok_or_else(|| ApdlkitError::HelperProtocol {
            command: format!("{} create", self.program),
            reason: "no project id on stdout".to_string(),
        })?;

        Ok(Project {
            id: id.to_string(),
            url: request.url.clone(),
            user: request.user.clone(),
            password: request.password.clone(),
        })
    }

    fn job_status(&self, handle: &Project) -> Result<JobStatus> {
        let payload = serde_json::to_string(&StatusQuery {
            url: &handle.url,
            user: &handle.user,
            password: &handle.password,
            project_id: &handle.id,
        })?;
        let stdout = self.invoke("status", &payload)?;

        let word = first_line(&stdout).unwrap_or("");
        word.parse().map_err(|reason| ApdlkitError::HelperProtocol {
            command: format!("{} status", self.program),
            reason,
        })
    }
}

/// 第一行非空内容
fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  proj-42 \nextra\n"), Some("proj-42"));
        assert_eq!(first_line("   \n"), None);
    }

    #[test]
    fn test_missing_helper_program() {
        let backend = HelperBackend::new("apdlkit-no-such-helper-program");
        let project = Project {
            id: "p".to_string(),
            url: "u".to_string(),
            user: "x".to_string(),
            password: "y".to_string(),
        };
        let err = backend.job_status(&project).unwrap_err();
        assert!(matches!(err, ApdlkitError::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_with_leading_args() {
        let dir = std::env::temp_dir().join(format!("apdlkit-helper-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("helper.sh");
        std::fs::write(
            &script,
            "cat > /dev/null\ncase \"$1\" in\n  create) echo proj-7 ;;\n  status) echo Running ;;\nesac\n",
        )
        .unwrap();

        let backend = HelperBackend::new(&format!("sh {}", script.display()));
        let project = Project {
            id: "proj-7".to_string(),
            url: "u".to_string(),
            user: "x".to_string(),
            password: "y".to_string(),
        };
        assert_eq!(backend.job_status(&project).unwrap(), JobStatus::Running);
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_ignoring_large_stdin() {
        let dir = std::env::temp_dir().join(format!("apdlkit-helper-stdin-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("no_stdin.sh");
        std::fs::write(&script, "echo proj-9\n").unwrap();

        let backend = HelperBackend::new(&format!("sh {}", script.display()));
        let payload = "x".repeat(4 << 20);
        let stdout = backend.invoke("create", &payload).unwrap();
        assert_eq!(first_line(&stdout), Some("proj-9"));
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_nonzero_exit() {
        let backend = HelperBackend::new("sh -c false");
        let project = Project {
            id: "p".to_string(),
            url: "u".to_string(),
            user: "x".to_string(),
            password: "y".to_string(),
        };
        assert!(matches!(
            backend.job_status(&project),
            Err(ApdlkitError::CommandFailed { .. })
        ));
    }
}
