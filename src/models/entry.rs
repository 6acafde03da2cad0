//! # 逐图像数据
//!
//! 每个文件在循环中临时构建，不会持久化。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 和 `policy.rs` 使用

use std::path::PathBuf;

/// 扫描/加载得到的图像条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// 源文件名（不含目录）
    pub filename: String,
    /// 原生宽度（像素）
    pub native_width: u32,
    /// 原生高度（像素）
    pub native_height: u32,
}

/// 单个文件的输出参数
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    /// 输出文件完整路径
    pub destination_path: PathBuf,
    /// 渲染宽度；相对缩放模式下为 None（沿用渲染器当前设置）
    pub width: Option<u32>,
    /// 渲染高度；相对缩放模式下为 None
    pub height: Option<u32>,
    /// 缩放阶段的比例，取值 (0, 1]
    pub scale_fraction: f64,
}
