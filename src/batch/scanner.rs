//! # 源目录扫描
//!
//! 列出目录中的常规文件名（不递归）。符号链接会被跟随：
//! 指向文件的链接计入结果，指向目录的链接和失效链接被忽略。
//! 空结果是合法返回值。
//!
//! 文件名不是合法 UTF-8 的文件无法参与命名，单独列出由调用方报告。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 和 `commands/check.rs` 使用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{ConverterError, Result};
use crate::models::ScanOrder;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 扫描结果
#[derive(Debug, Default)]
pub struct FileListing {
    /// 待处理的文件名
    pub files: Vec<String>,
    /// 因文件名不是 UTF-8 而跳过的文件
    pub skipped: Vec<PathBuf>,
}

impl FileListing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// 列出 `dir` 中匹配 `pattern` 的常规文件名
pub fn list_files(dir: &Path, order: ScanOrder, pattern: &str) -> Result<FileListing> {
    if !dir.is_dir() {
        return Err(ConverterError::SourceFolderNotFound {
            path: dir.display().to_string(),
        });
    }

    let glob_pattern = glob::Pattern::new(pattern).map_err(|e| {
        ConverterError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
    })?;

    // 先确认目录可读，避免把权限错误当作空目录
    std::fs::read_dir(dir).map_err(|e| ConverterError::FileReadError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    let mut listing = FileListing::default();
    for entry in walker {
        match entry.file_name().to_str() {
            Some(name) if glob_pattern.matches(name) => listing.files.push(name.to_string()),
            Some(_) => {}
            None => listing.skipped.push(entry.into_path()),
        }
    }

    if order == ScanOrder::Lexicographic {
        listing.files.sort();
        listing.skipped.sort();
    }

    Ok(listing)
}
