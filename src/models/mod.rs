//! # 数据模型模块
//!
//! 定义转换任务、输出格式以及逐图像的中间数据。
//!
//! ## 依赖关系
//! - 被 `batch/`, `host/`, `commands/` 使用
//! - 子模块: job, format, entry

pub mod entry;
pub mod format;
pub mod job;

pub use entry::{ImageEntry, OutputSpec};
pub use format::OutputFormat;
pub use job::{ConversionJob, ScanOrder};
