//! # 输出图像格式
//!
//! 渲染器可写出的目标格式及其扩展名。
//!
//! ## 依赖关系
//! - 被 `host/` 和 `cli/convert.rs` 使用

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Portable Network Graphics
    #[default]
    Png,
    /// JPEG (alpha channel is dropped)
    Jpeg,
    /// Windows bitmap
    Bmp,
    /// Truevision Targa
    Tga,
    /// Tagged Image File Format
    Tiff,
}

impl OutputFormat {
    /// 所有支持的格式
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Bmp,
        OutputFormat::Tga,
        OutputFormat::Tiff,
    ];

    /// 输出文件扩展名（含前导点）
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg => ".jpg",
            OutputFormat::Bmp => ".bmp",
            OutputFormat::Tga => ".tga",
            OutputFormat::Tiff => ".tif",
        }
    }

    /// 对应的 `image` 编码格式
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
            OutputFormat::Tga => image::ImageFormat::Tga,
            OutputFormat::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// 是否支持 alpha 通道
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg | OutputFormat::Bmp)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Bmp => write!(f, "bmp"),
            OutputFormat::Tga => write!(f, "tga"),
            OutputFormat::Tiff => write!(f, "tiff"),
        }
    }
}
