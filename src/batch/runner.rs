//! # 批量执行器
//!
//! 驱动一次完整的批量转换，状态机如下：
//!
//! ```text
//! Idle → Validated → PipelineReady → Processing(i) → Done
//!   └──────────┴────────────┴──────────────┴──────→ Failed
//! ```
//!
//! - 校验：源目录与输出目录都必须是目录（缩放模式下还要校验百分比）
//! - 扫描：源目录为空时直接失败，不修改节点图、不渲染
//! - 构建管线一次，加载第一张图像并绑定到源节点
//! - 逐文件：修改绑定图像的路径 → 重新解码 → 查询尺寸 → 设置分辨率与输出路径 → 渲染写盘
//!
//! 任何渲染错误都会立即中止剩余文件；已写出的文件保留在磁盘上。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `host/`, `pipeline/`, `policy.rs`, `naming.rs`, `batch/scanner.rs`
//! - 使用 `utils/progress.rs` 创建进度条

use crate::batch::scanner;
use crate::error::{ConverterError, Result};
use crate::host::{Host, ImageId};
use crate::models::{ConversionJob, ImageEntry, OutputSpec};
use crate::naming;
use crate::pipeline::{self, ConfirmRebuild, Pipeline};
use crate::policy::{self, SCALE_PERCENT_RANGE};
use crate::utils::progress;

use indicatif::ProgressBar;
use std::path::PathBuf;

/// 批量运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validated,
    PipelineReady,
    /// 正在处理第 i 个文件（从 0 开始）
    Processing(usize),
    Done,
    Failed,
}

/// 单个已转换文件
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedFile {
    pub source: String,
    pub destination: PathBuf,
    pub native_width: u32,
    pub native_height: u32,
    /// 绝对像素模式下的渲染尺寸
    pub render_size: Option<(u32, u32)>,
    pub scale_fraction: f64,
}

/// 成功运行的结果
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    /// 扫描时因文件名不是 UTF-8 而跳过的文件
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len()
    }
}

/// 运行前校验（轻量，可反复调用）
pub fn validate(job: &ConversionJob, scale_percent: u32) -> Result<()> {
    if !job.source_folder.is_dir() {
        return Err(ConverterError::SourceFolderNotFound {
            path: job.source_folder.display().to_string(),
        });
    }

    if !job.destination_folder.is_dir() {
        return Err(ConverterError::DestinationFolderNotFound {
            path: job.destination_folder.display().to_string(),
        });
    }

    if !job.keep_original_resolution && !SCALE_PERCENT_RANGE.contains(&scale_percent) {
        return Err(ConverterError::InvalidScale {
            percent: scale_percent,
        });
    }

    Ok(())
}

/// 批量执行器
///
/// 运行期间通过 `&mut H` 独占宿主的节点图与图像绑定。
pub struct BatchRunner<'h, H: Host> {
    job: ConversionJob,
    host: &'h mut H,
    state: RunState,
    show_progress: bool,
}

impl<'h, H: Host> BatchRunner<'h, H> {
    /// 创建新的批量执行器
    pub fn new(job: ConversionJob, host: &'h mut H) -> Self {
        Self {
            job,
            host,
            state: RunState::Idle,
            show_progress: false,
        }
    }

    /// 是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// 全局缩放百分比取自宿主的渲染百分比
    fn global_scale_percent(&self) -> u32 {
        self.host.render_settings().resolution_percentage
    }

    /// 执行批量转换；每个执行器只能运行一次
    pub fn run(&mut self, confirm: &dyn ConfirmRebuild) -> Result<BatchReport> {
        if self.state != RunState::Idle {
            return Err(ConverterError::InvalidArgument(format!(
                "Batch runner already ran (state: {:?})",
                self.state
            )));
        }

        let result = self.execute(confirm);
        self.state = match result {
            Ok(_) => RunState::Done,
            Err(_) => RunState::Failed,
        };
        result
    }

    fn execute(&mut self, confirm: &dyn ConfirmRebuild) -> Result<BatchReport> {
        validate(&self.job, self.global_scale_percent())?;
        self.state = RunState::Validated;

        let listing =
            scanner::list_files(&self.job.source_folder, self.job.order, &self.job.pattern)?;
        if listing.is_empty() {
            return Err(ConverterError::NoInputImages {
                path: self.job.source_folder.display().to_string(),
            });
        }

        let pipeline = pipeline::build_pipeline(self.host.graph_mut(), confirm)?;
        self.state = RunState::PipelineReady;

        let files = listing.files;
        let image = self.host.load_image(&self.job.source_folder.join(&files[0]))?;
        pipeline.bind_image(self.host.graph_mut(), image)?;

        if !self.job.keep_original_resolution {
            let fraction = policy::scale_fraction(self.global_scale_percent());
            pipeline.set_scale(self.host.graph_mut(), fraction)?;
        }

        let pb = if self.show_progress {
            progress::create_progress_bar(files.len() as u64, "Converting")
        } else {
            ProgressBar::hidden()
        };

        let mut report = BatchReport {
            converted: Vec::with_capacity(files.len()),
            skipped: listing.skipped,
        };
        for (i, filename) in files.iter().enumerate() {
            self.state = RunState::Processing(i);
            pb.set_message(filename.clone());

            match self.process_file(&pipeline, image, filename) {
                Ok(converted) => report.converted.push(converted),
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(report)
    }

    /// 处理单个文件：绑定不变，只修改图像路径并重新解码
    fn process_file(
        &mut self,
        pipeline: &Pipeline,
        image: ImageId,
        filename: &str,
    ) -> Result<ConvertedFile> {
        let source_path = self.job.source_folder.join(filename);
        self.host.set_image_filepath(image, &source_path)?;
        self.host.reload_image(image)?;

        let (native_width, native_height) = self.host.image_size(image)?;
        let entry = ImageEntry {
            filename: filename.to_string(),
            native_width,
            native_height,
        };

        let target = policy::resolve(
            &self.job,
            entry.native_width,
            entry.native_height,
            self.global_scale_percent(),
        );
        let spec = self.output_spec(&entry, target);

        debug_assert_eq!(pipeline.bound_image(self.host.graph()), Some(image));

        let settings = self.host.render_settings_mut();
        if let policy::ResolutionTarget::Absolute {
            width,
            height,
            percent,
        } = target
        {
            settings.set_resolution(width, height, percent);
        }
        settings.output_path = spec.destination_path.clone();

        let destination = self.host.render(true)?;

        Ok(ConvertedFile {
            source: entry.filename,
            destination,
            native_width: entry.native_width,
            native_height: entry.native_height,
            render_size: spec.width.zip(spec.height),
            scale_fraction: spec.scale_fraction,
        })
    }

    fn output_spec(&self, entry: &ImageEntry, target: policy::ResolutionTarget) -> OutputSpec {
        let extension = self.host.render_settings().file_extension();
        let name = naming::destination_name(
            &entry.filename,
            &self.job.prefix,
            &self.job.suffix,
            extension,
        );
        let (width, height) = match target.dimensions() {
            Some((w, h)) => (Some(w), Some(h)),
            None => (None, None),
        };

        OutputSpec {
            destination_path: self.job.destination_folder.join(name),
            width,
            height,
            scale_fraction: target.scale_fraction(),
        }
    }
}
