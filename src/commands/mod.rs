//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `host/`, `utils/`
//! - 子模块: convert, check, formats

pub mod check;
pub mod convert;
pub mod formats;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Formats => formats::execute(),
    }
}
