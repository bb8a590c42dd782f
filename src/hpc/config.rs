//! # HPS 提交配置解析
//!
//! 每个提交参数按以下优先级取值：
//! 1. 命令行显式给出的非空值
//! 2. JSON 配置文件中的同名键
//! 3. 固定默认值（`url`/`user`/`password` 没有默认值，缺失即报错）
//!
//! 成功提交后可将解析结果整体写回配置文件（覆盖，不合并）。
//!
//! ## 依赖关系
//! - 被 `hpc/mod.rs`, `commands/submit.rs` 使用
//! - 使用 `serde_json` 读写配置文件

use crate::error::{ApdlkitError, Result};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "hps_config.json";

pub const DEFAULT_JOB_NAME: &str = "My PyMAPDL job";
pub const DEFAULT_PYTHON: &str = "3";
pub const DEFAULT_NUM_CORES: u32 = 1;
pub const DEFAULT_MEMORY: u64 = 100;
pub const DEFAULT_DISK_SPACE: u64 = 100;
pub const DEFAULT_EXCLUSIVE: bool = false;
pub const DEFAULT_MAX_EXECUTION_TIME: u64 = 1000;

/// 当前目录下的默认配置文件路径
pub fn default_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| ApdlkitError::FileReadError {
        path: ".".to_string(),
        source: e,
    })?;
    Ok(cwd.join(DEFAULT_CONFIG_FILE))
}

// ─────────────────────────────────────────────────────────────
// 配置文件
// ─────────────────────────────────────────────────────────────

/// 扁平的 JSON 配置文件
#[derive(Debug, Default, Clone)]
pub struct ConfigFile {
    values: Map<String, Value>,
}

impl ConfigFile {
    /// 读取配置文件
    ///
    /// 文件不存在或为空时视为空配置。
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("Config file '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| ApdlkitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(values)) => Ok(ConfigFile { values }),
            Ok(other) => Err(ApdlkitError::ParseError {
                format: "JSON".to_string(),
                path: path.display().to_string(),
                reason: format!("expected an object, found {}", json_kind(&other)),
            }),
            Err(e) => Err(ApdlkitError::ParseError {
                format: "JSON".to_string(),
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        ConfigFile { values }
    }

    /// 取键值，`null` 视为缺失
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────────────────────
// 单个参数的取值
// ─────────────────────────────────────────────────────────────

/// 可从配置文件读取的参数类型
///
/// 转换是宽松的：保存过的配置可能把数字写成字符串。
pub trait Setting: Sized + Display {
    fn from_json(value: &Value) -> Option<Self>;

    /// 命令行空字符串视为未提供
    fn is_blank(&self) -> bool {
        false
    }
}

impl Setting for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Setting for u32 {
    fn from_json(value: &Value) -> Option<Self> {
        u64::from_json(value).and_then(|v| u32::try_from(v).ok())
    }
}

impl Setting for u64 {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Setting for bool {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_u64().map(|v| v != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// 按优先级解析单个参数
pub fn resolve<T: Setting>(
    cli: Option<T>,
    file: &ConfigFile,
    key: &str,
    default: Option<T>,
) -> Result<T> {
    if let Some(value) = cli.filter(|v| !v.is_blank()) {
        log::debug!("Using '{}' for {} (command line)", value, key);
        return Ok(value);
    }

    if let Some(raw) = file.get(key) {
        let value = T::from_json(raw).ok_or_else(|| ApdlkitError::InvalidSetting {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
        log::debug!("Using '{}' for {} (config file)", value, key);
        return Ok(value);
    }

    match default {
        Some(value) => {
            log::debug!("Using '{}' for {} (default)", value, key);
            Ok(value)
        }
        None => Err(ApdlkitError::MissingSetting {
            key: key.to_string(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────
// 完整的提交配置
// ─────────────────────────────────────────────────────────────

/// 命令行给出的原始值
#[derive(Debug, Default, Clone)]
pub struct SettingOverrides {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub python: Option<String>,
    pub name: Option<String>,
    pub num_cores: Option<u32>,
    pub memory: Option<u64>,
    pub disk_space: Option<u64>,
    pub exclusive: Option<bool>,
    pub max_execution_time: Option<u64>,
}

/// 解析后的提交配置，也是写回配置文件的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitSettings {
    pub url: String,
    pub user: String,
    pub password: String,
    pub python: String,
    pub name: String,
    pub num_cores: u32,
    /// MB
    pub memory: u64,
    /// MB
    pub disk_space: u64,
    pub exclusive: bool,
    /// 秒
    pub max_execution_time: u64,
}

impl SubmitSettings {
    pub fn resolve(cli: SettingOverrides, file: &ConfigFile) -> Result<Self> {
        Ok(SubmitSettings {
            url: resolve(cli.url, file, "url", None)?,
            user: resolve(cli.user, file, "user", None)?,
            password: resolve(cli.password, file, "password", None)?,
            python: resolve(cli.python, file, "python", Some(DEFAULT_PYTHON.to_string()))?,
            name: resolve(cli.name, file, "name", Some(DEFAULT_JOB_NAME.to_string()))?,
            num_cores: resolve(cli.num_cores, file, "num_cores", Some(DEFAULT_NUM_CORES))?,
            memory: resolve(cli.memory, file, "memory", Some(DEFAULT_MEMORY))?,
            disk_space: resolve(cli.disk_space, file, "disk_space", Some(DEFAULT_DISK_SPACE))?,
            exclusive: resolve(cli.exclusive, file, "exclusive", Some(DEFAULT_EXCLUSIVE))?,
            max_execution_time: resolve(
                cli.max_execution_time,
                file,
                "max_execution_time",
                Some(DEFAULT_MAX_EXECUTION_TIME),
            )?,
        })
    }

    /// 覆盖写入配置文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| ApdlkitError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        log::info!("Configuration saved to '{}'", path.display());
        Ok(())
    }
}
