//! # check 子命令 CLI 定义
//!
//! 运行前校验任务配置，不修改任何文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use super::convert::JobArgs;
use clap::Args;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Global resolution percentage to validate
    #[arg(long, default_value_t = 100)]
    pub scale: u32,
}
