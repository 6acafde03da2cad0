//! # convert 子命令 CLI 定义
//!
//! 批量转换源目录中的图像，输出到目标目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use crate::error::{ConverterError, Result};
use crate::host::RenderSettings;
use crate::models::{ConversionJob, OutputFormat, ScanOrder};

use clap::Args;
use std::path::PathBuf;

/// 任务参数（convert 与 check 共用）
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Folder of source images
    #[arg(short, long, required_unless_present = "job")]
    pub source: Option<PathBuf>,

    /// Folder for converted images (must already exist)
    #[arg(short, long, required_unless_present = "job")]
    pub destination: Option<PathBuf>,

    /// Prefix added before each output filename
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Suffix added after each output filename (before the extension)
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Keep each image's original resolution
    #[arg(short, long, default_value_t = false)]
    pub keep_resolution: bool,

    /// Glob pattern for source filenames
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Processing order of source files
    #[arg(long, value_enum, default_value_t = ScanOrder::Lexicographic)]
    pub order: ScanOrder,

    /// Load the job (folders, naming, resolution mode, pattern, order) from a JSON file
    #[arg(
        long,
        conflicts_with_all = [
            "source",
            "destination",
            "prefix",
            "suffix",
            "keep_resolution",
            "pattern",
            "order",
        ]
    )]
    pub job: Option<PathBuf>,
}

impl JobArgs {
    /// 从任务文件或命令行参数构建任务
    pub fn to_job(&self) -> Result<ConversionJob> {
        if let Some(path) = &self.job {
            return ConversionJob::load(path);
        }

        let (Some(source), Some(destination)) = (&self.source, &self.destination) else {
            return Err(ConverterError::InvalidArgument(
                "--source and --destination are required without --job".to_string(),
            ));
        };

        let mut job = ConversionJob::new(source, destination);
        job.prefix = self.prefix.clone();
        job.suffix = self.suffix.clone();
        job.keep_original_resolution = self.keep_resolution;
        job.pattern = self.pattern.clone();
        job.order = self.order;
        Ok(job)
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Target output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Global resolution percentage applied to every image (ignored with --keep-resolution)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub scale: u32,

    /// Render frame size, e.g. 1920x1080 (defaults to the scaled image size)
    #[arg(short, long, value_parser = parse_resolution)]
    pub resolution: Option<(u32, u32)>,

    /// Save the job to a JSON file before running
    #[arg(long)]
    pub save_job: Option<PathBuf>,

    /// Render node graph file kept between runs (created if missing)
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Rebuild a non-empty render node graph without asking
    #[arg(short, long, default_value_t = false)]
    pub yes: bool,
}

impl ConvertArgs {
    /// 渲染器初始设置
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            resolution: self.resolution,
            resolution_percentage: self.scale,
            output_path: PathBuf::new(),
            format: self.format,
        }
    }
}

/// 解析渲染尺寸（`WIDTHxHEIGHT`）
pub fn parse_resolution(input: &str) -> std::result::Result<(u32, u32), String> {
    let invalid = || {
        format!(
            "Invalid resolution '{}'. Use WIDTHxHEIGHT with positive integers (e.g., 1920x1080)",
            input
        )
    };

    let (w, h) = input
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
