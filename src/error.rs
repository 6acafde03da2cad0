//! # 统一错误处理模块
//!
//! 定义 imgbatch 的所有错误类型，使用 `thiserror` 派生。
//!
//! 错误分为三类终止状态：
//! - 配置错误（目录无效、缩放比例越界、拒绝重建节点图）→ 视为操作取消
//! - 源目录为空 → 失败，未进行任何渲染
//! - 渲染/写盘错误 → 失败，立即中止剩余文件
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// imgbatch 统一错误类型
#[derive(Error, Debug)]
pub enum ConverterError {
    // ─────────────────────────────────────────────────────────────
    // 配置错误（操作取消）
    // ─────────────────────────────────────────────────────────────
    #[error("Source folder is not a directory: {path}")]
    SourceFolderNotFound { path: String },

    #[error("Destination folder is not a directory: {path}")]
    DestinationFolderNotFound { path: String },

    #[error("Invalid scale {percent}%: must be within 1..=100")]
    InvalidScale { percent: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Rebuilding the render node graph was declined ({nodes} existing node(s) kept)")]
    RebuildDeclined { nodes: usize },

    // ─────────────────────────────────────────────────────────────
    // 输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("No images found in source folder: {path}")]
    NoInputImages { path: String },

    // ─────────────────────────────────────────────────────────────
    // 渲染错误
    // ─────────────────────────────────────────────────────────────
    #[error("Render failed for {path}\nReason: {reason}")]
    RenderIo { path: String, reason: String },

    #[error("Failed to decode image: {path}")]
    ImageDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid job file: {path}")]
    JobFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid node graph file: {path}")]
    GraphFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConverterError {
    /// 是否为配置类错误（对应操作取消，而非运行失败）
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ConverterError::SourceFolderNotFound { .. }
                | ConverterError::DestinationFolderNotFound { .. }
                | ConverterError::InvalidScale { .. }
                | ConverterError::InvalidArgument(_)
                | ConverterError::RebuildDeclined { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ConverterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_cancellations() {
        let err = ConverterError::SourceFolderNotFound {
            path: "/nope".to_string(),
        };
        assert!(err.is_cancelled());
        assert!(ConverterError::RebuildDeclined { nodes: 4 }.is_cancelled());
    }

    #[test]
    fn test_run_errors_are_failures() {
        let err = ConverterError::NoInputImages {
            path: "/empty".to_string(),
        };
        assert!(!err.is_cancelled());

        let err = ConverterError::RenderIo {
            path: "out.png".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(!err.is_cancelled());
        assert!(err.to_string().contains("disk full"));
    }
}
