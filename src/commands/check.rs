//! # check 命令实现
//!
//! 校验任务配置并报告将被处理的文件数，不写入任何文件、不修改节点图。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的参数
//! - 使用 `batch::validate`, `batch::list_files`

use crate::batch;
use crate::cli::check::CheckArgs;
use crate::commands::convert::warn_skipped;
use crate::error::{ConverterError, Result};
use crate::utils::output;

/// 执行 check 命令
pub fn execute(args: CheckArgs) -> Result<()> {
    output::print_header("Checking conversion job");

    let job = args.job.to_job()?;
    batch::validate(&job, args.scale)?;
    output::print_success(&format!(
        "Folders are valid: '{}' -> '{}'",
        job.source_folder.display(),
        job.destination_folder.display()
    ));

    let listing = batch::list_files(&job.source_folder, job.order, &job.pattern)?;
    warn_skipped(&listing.skipped);
    if listing.is_empty() {
        return Err(ConverterError::NoInputImages {
            path: job.source_folder.display().to_string(),
        });
    }

    output::print_done(&format!(
        "{} file(s) matching '{}' ready to convert in {} order",
        listing.files.len(),
        job.pattern,
        job.order
    ));
    Ok(())
}
