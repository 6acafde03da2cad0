//! # convert 命令实现
//!
//! 批量转换图像格式与分辨率。
//!
//! ## 功能
//! - 从命令行参数或 JSON 任务文件构建任务
//! - 运行前校验目录
//! - 使用本地宿主（`image` crate）逐张渲染
//! - 可选的节点图文件：运行前加载，运行后保存；
//!   非空节点图被重建前需要确认（`--yes` 或终端提示）
//! - 汇总输出文件列表
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/`, `host/`, `pipeline/`
//! - 使用 `utils/output.rs`, `utils/prompt.rs`

use crate::batch::{self, BatchReport, BatchRunner};
use crate::cli::convert::ConvertArgs;
use crate::error::Result;
use crate::host::{Host, NativeHost, NodeGraph, RenderSettings};
use crate::models::ConversionJob;
use crate::pipeline::{AssumeYes, ConfirmRebuild};
use crate::utils::{output, prompt::TerminalPrompt};

use std::path::Path;
use tabled::{Table, Tabled};

/// 转换结果行
#[derive(Debug, Clone, Tabled)]
struct ConvertedRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Render")]
    render: String,
    #[tabled(rename = "Output")]
    output: String,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Batch converting to {} format", args.format));

    let job = args.job.to_job()?;

    if let Some(path) = &args.save_job {
        job.save(path)?;
        output::print_info(&format!("Saved job to '{}'", path.display()));
    }

    let settings = args.render_settings();
    batch::validate(&job, settings.resolution_percentage)?;

    output::print_info(&format!(
        "Source: '{}' -> destination: '{}'",
        job.source_folder.display(),
        job.destination_folder.display()
    ));
    if job.keep_original_resolution {
        output::print_info("Keeping each image's original resolution");
    } else {
        output::print_info(&format!(
            "Scaling every image to {}%",
            settings.resolution_percentage
        ));
    }

    let confirm: Box<dyn ConfirmRebuild> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };

    if let Some(path) = &args.graph {
        output::print_info(&format!("Render node graph: '{}'", path.display()));
    }

    let report = run_job(job, settings, args.graph.as_deref(), confirm.as_ref(), true)?;

    print_report(&report);
    warn_skipped(&report.skipped);

    output::print_done(&format!(
        "Converted {} image(s) to '{}'",
        report.total(),
        args.format
    ));

    Ok(())
}

/// 在本地宿主上运行任务
///
/// 给出 `graph_path` 时先从该文件加载节点图（不存在则为空图），
/// 运行结束后无论成败都把宿主的节点图写回。
pub fn run_job(
    job: ConversionJob,
    settings: RenderSettings,
    graph_path: Option<&Path>,
    confirm: &dyn ConfirmRebuild,
    show_progress: bool,
) -> Result<BatchReport> {
    let graph = match graph_path {
        Some(path) => NodeGraph::load_or_default(path)?,
        None => NodeGraph::new(),
    };

    let mut host = NativeHost::new(settings).with_graph(graph);
    let result = BatchRunner::new(job, &mut host)
        .with_progress(show_progress)
        .run(confirm);

    if let Some(path) = graph_path {
        host.graph().save(path)?;
    }
    result
}

/// 报告扫描时跳过的文件
pub fn warn_skipped(skipped: &[std::path::PathBuf]) {
    if skipped.is_empty() {
        return;
    }
    output::print_warning(&format!(
        "Skipped {} file(s) whose names are not valid UTF-8:",
        skipped.len()
    ));
    for path in skipped {
        println!("  {}", path.display());
    }
}

fn print_report(report: &BatchReport) {
    let rows: Vec<ConvertedRow> = report
        .converted
        .iter()
        .enumerate()
        .map(|(i, file)| ConvertedRow {
            index: i + 1,
            source: file.source.clone(),
            size: format!("{}x{}", file.native_width, file.native_height),
            render: match file.render_size {
                Some((w, h)) => format!("{}x{}", w, h),
                None => format!("{:.0}%", file.scale_fraction * 100.0),
            },
            output: file
                .destination
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(&rows));
}
