//! # 渲染宿主模块
//!
//! 批量转换只依赖宿主渲染器的契约，不依赖其实现：
//! - 节点图修改：`graph_mut()` → `NodeGraph::{clear, add_node, connect}`
//! - 图像解码与元数据：`load_image`, `set_image_filepath`, `reload_image`, `image_size`
//! - 渲染：`render_settings_mut()` 设置输出路径和分辨率，`render(write_still)` 执行并写盘
//!
//! ## 子模块
//! - `graph`: 节点图
//! - `native`: 基于 `image` crate 的本地宿主实现
//!
//! ## 依赖关系
//! - 被 `pipeline/`, `batch/`, `commands/` 使用
//! - 使用 `models/format.rs`

pub mod graph;
pub mod native;
#[cfg(test)]
pub mod recording;

pub use graph::{NodeData, NodeGraph, NodeId, NodeKind};
pub use native::NativeHost;

use crate::error::Result;
use crate::models::OutputFormat;

use std::path::{Path, PathBuf};

/// 宿主图像库中的图像句柄
pub type ImageId = usize;

/// 渲染输出设置
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// 渲染尺寸；None 表示由合成结果自身尺寸决定
    pub resolution: Option<(u32, u32)>,
    /// 渲染百分比（同时作为全局缩放百分比）
    pub resolution_percentage: u32,
    /// 输出文件路径
    pub output_path: PathBuf,
    /// 输出格式
    pub format: OutputFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            resolution: None,
            resolution_percentage: 100,
            output_path: PathBuf::new(),
            format: OutputFormat::default(),
        }
    }
}

impl RenderSettings {
    /// 当前输出格式的扩展名
    pub fn file_extension(&self) -> &'static str {
        self.format.file_extension()
    }

    /// 设置绝对渲染尺寸
    pub fn set_resolution(&mut self, width: u32, height: u32, percentage: u32) {
        self.resolution = Some((width, height));
        self.resolution_percentage = percentage;
    }

    /// 实际输出画幅：渲染尺寸 × 百分比
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.resolution.map(|(w, h)| {
            let pct = self.resolution_percentage as f64 / 100.0;
            (scaled_axis(w, pct), scaled_axis(h, pct))
        })
    }
}

/// 按比例缩放一个轴的像素数，四舍五入；正比例下至少保留 1 像素
pub fn scaled_axis(len: u32, factor: f64) -> u32 {
    let scaled = (len as f64 * factor).round() as u32;
    if factor > 0.0 && len > 0 {
        scaled.max(1)
    } else {
        scaled
    }
}

/// 宿主渲染器契约
///
/// 所有调用都是同步阻塞的；实现不需要线程安全，
/// 批量运行期间由 `BatchRunner` 通过 `&mut` 独占。
pub trait Host {
    fn graph(&self) -> &NodeGraph;

    fn graph_mut(&mut self) -> &mut NodeGraph;

    /// 打开并解码图像，返回句柄
    fn load_image(&mut self, path: &Path) -> Result<ImageId>;

    /// 修改图像的源文件路径（像素数据需 `reload_image` 后才更新）
    fn set_image_filepath(&mut self, image: ImageId, path: &Path) -> Result<()>;

    /// 从当前路径重新解码像素数据
    fn reload_image(&mut self, image: ImageId) -> Result<()>;

    /// 已解码图像的像素尺寸
    fn image_size(&self, image: ImageId) -> Result<(u32, u32)>;

    fn render_settings(&self) -> &RenderSettings;

    fn render_settings_mut(&mut self) -> &mut RenderSettings;

    /// 执行节点图；`write_still` 为 true 时写入 `output_path`，返回写出的路径
    fn render(&mut self, write_still: bool) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_applies_percentage() {
        let mut settings = RenderSettings::default();
        assert_eq!(settings.frame_size(), None);

        settings.set_resolution(1920, 1080, 50);
        assert_eq!(settings.frame_size(), Some((960, 540)));

        settings.set_resolution(800, 600, 100);
        assert_eq!(settings.frame_size(), Some((800, 600)));

        settings.set_resolution(20, 10, 1);
        assert_eq!(settings.frame_size(), Some((1, 1)));
    }

    #[test]
    fn test_scaled_axis_keeps_one_pixel() {
        assert_eq!(scaled_axis(1, 0.01), 1);
        assert_eq!(scaled_axis(640, 0.01), 6);
        assert_eq!(scaled_axis(3, 0.5), 2);
        assert_eq!(scaled_axis(8, 0.0), 0);
    }

    #[test]
    fn test_file_extension_follows_format() {
        let mut settings = RenderSettings::default();
        assert_eq!(settings.file_extension(), ".png");
        settings.format = OutputFormat::Jpeg;
        assert_eq!(settings.file_extension(), ".jpg");
    }
}
