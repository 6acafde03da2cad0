//! # 分辨率策略
//!
//! 决定每张图像保持原生分辨率，还是对所有图像统一应用全局百分比缩放。
//!
//! - 保持原生分辨率：渲染尺寸 = 图像原生尺寸，百分比 = 100（绝对像素模式）
//! - 全局缩放：缩放阶段两个轴的比例 = 百分比 / 100，渲染尺寸沿用渲染器当前设置
//!
//! 本策略不拒绝 0%（会得到零尺寸输出），范围校验由 `BatchRunner::validate` 负责。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `models/job.rs`

use crate::models::ConversionJob;

/// 合法的全局缩放百分比范围
pub const SCALE_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// 单张图像的目标分辨率
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionTarget {
    /// 绝对像素模式：覆盖渲染尺寸
    Absolute {
        width: u32,
        height: u32,
        percent: u32,
    },
    /// 百分比模式：缩放阶段按比例缩放源图像
    Relative { scale_fraction: f64 },
}

impl ResolutionTarget {
    /// 缩放阶段使用的比例
    pub fn scale_fraction(&self) -> f64 {
        match self {
            ResolutionTarget::Absolute { .. } => 1.0,
            ResolutionTarget::Relative { scale_fraction } => *scale_fraction,
        }
    }

    /// 需要写入渲染器的尺寸（仅绝对模式）
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            ResolutionTarget::Absolute { width, height, .. } => Some((*width, *height)),
            ResolutionTarget::Relative { .. } => None,
        }
    }
}

/// 百分比转比例
pub fn scale_fraction(global_scale_percent: u32) -> f64 {
    global_scale_percent as f64 / 100.0
}

/// 计算目标分辨率
pub fn resolve(
    job: &ConversionJob,
    native_width: u32,
    native_height: u32,
    global_scale_percent: u32,
) -> ResolutionTarget {
    if job.keep_original_resolution {
        ResolutionTarget::Absolute {
            width: native_width,
            height: native_height,
            percent: 100,
        }
    } else {
        ResolutionTarget::Relative {
            scale_fraction: scale_fraction(global_scale_percent),
        }
    }
}
