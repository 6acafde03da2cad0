//! # 转换任务
//!
//! 用户提供的一次批量转换配置。运行期间不可变，由 `BatchRunner` 独占。
//! 可以保存为 JSON 任务文件并在之后重新加载。
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/convert.rs` 使用
//! - 使用 `serde_json` 读写任务文件

use crate::error::{ConverterError, Result};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 源目录扫描顺序
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Sort file names lexicographically (deterministic)
    #[default]
    Lexicographic,
    /// Keep the order the filesystem listing yields
    Listing,
}

impl std::fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanOrder::Lexicographic => write!(f, "lexicographic"),
            ScanOrder::Listing => write!(f, "listing"),
        }
    }
}

fn default_pattern() -> String {
    "*".to_string()
}

/// 一次批量转换任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// 源图像目录
    pub source_folder: PathBuf,

    /// 输出目录
    pub destination_folder: PathBuf,

    /// 文件名前缀
    #[serde(default)]
    pub prefix: String,

    /// 文件名后缀（位于扩展名之前）
    #[serde(default)]
    pub suffix: String,

    /// 保持每张图像的原生分辨率
    #[serde(default)]
    pub keep_original_resolution: bool,

    /// 源文件名匹配模式
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// 扫描顺序
    #[serde(default)]
    pub order: ScanOrder,
}

impl ConversionJob {
    /// 创建默认命名与扫描策略的任务
    pub fn new(source_folder: impl Into<PathBuf>, destination_folder: impl Into<PathBuf>) -> Self {
        ConversionJob {
            source_folder: source_folder.into(),
            destination_folder: destination_folder.into(),
            prefix: String::new(),
            suffix: String::new(),
            keep_original_resolution: false,
            pattern: default_pattern(),
            order: ScanOrder::default(),
        }
    }

    /// 从 JSON 任务文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConverterError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConverterError::JobFile {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 保存为 JSON 任务文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| ConverterError::JobFile {
            path: path.display().to_string(),
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConverterError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
