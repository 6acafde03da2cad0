//! # imgbatch - 批量图像转换工具
//!
//! 通过宿主渲染器的节点管线（图像源 → 缩放 → 合成输出）
//! 将源目录中的图像逐张转换为目标格式与分辨率。
//!
//! ## 子命令
//! - `convert` - 批量转换
//! - `check`   - 运行前校验目录
//! - `formats` - 列出支持的输出格式
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (扫描与批量执行)
//!   │     ├── pipeline/  (三节点管线)
//!   │     ├── host/      (宿主渲染器契约与本地实现)
//!   │     ├── policy.rs  (分辨率策略)
//!   │     ├── naming.rs  (输出命名)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod host;
mod models;
mod naming;
mod pipeline;
mod policy;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        if e.is_cancelled() {
            utils::output::print_cancelled(&format!("{}", e));
            std::process::exit(2);
        }
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
